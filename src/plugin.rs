// protoc-gen-lbclient/src/plugin.rs

use prost_reflect::DescriptorPool;
use prost_types::compiler::{code_generator_response, CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::{FileDescriptorProto, FileDescriptorSet};

use crate::render::{Renderer, DEFAULT_REGISTRY_ADDR};
use crate::resolver::{PoolResolver, TypeNameResolver};
use crate::spec::build_service_spec;
use crate::Error;

/// Generation options carried in the protoc plugin parameter
/// (`--lbclient_opt=registry_addr=http://consul.internal:8500`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub registry_addr: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            registry_addr: DEFAULT_REGISTRY_ADDR.to_string(),
        }
    }
}

impl Options {
    /// Parse the comma-separated `key=value` plugin parameter. Unknown keys
    /// are rejected, not ignored.
    pub fn parse(parameter: Option<&str>) -> Result<Self, Error> {
        let mut options = Self::default();
        let Some(parameter) = parameter else {
            return Ok(options);
        };

        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some(("registry_addr", value)) if !value.is_empty() => {
                    options.registry_addr = value.to_string();
                }
                _ => return Err(Error::InvalidParameter(part.to_string())),
            }
        }

        Ok(options)
    }
}

/// The seam visible to the host compiler: emits the import block once per
/// unit, then one rendered client block per service. Holds a renderer and
/// borrows the resolver; it does not own any descriptor state.
pub struct LbClientPlugin {
    renderer: Renderer,
}

impl LbClientPlugin {
    pub fn new(options: &Options) -> Self {
        Self {
            renderer: Renderer::new(options.registry_addr.clone()),
        }
    }

    /// Name protoc addresses the plugin by (`protoc-gen-lbclient`).
    pub fn name(&self) -> &'static str {
        "lbclient"
    }

    /// Append the fixed dependency block when the unit declares services.
    pub fn generate_imports(
        &self,
        file: &FileDescriptorProto,
        buf: &mut String,
    ) -> Result<(), Error> {
        if file.service.is_empty() {
            return Ok(());
        }
        buf.push_str(&self.renderer.render_imports()?);
        Ok(())
    }

    /// Extract and render every service of the unit, in declaration order.
    pub fn generate_body(
        &self,
        file: &FileDescriptorProto,
        resolver: &dyn TypeNameResolver,
        buf: &mut String,
    ) -> Result<(), Error> {
        for service in &file.service {
            let spec = build_service_spec(service, file.package(), resolver)?;
            buf.push('\n');
            buf.push_str(&self.renderer.render(&spec)?);
        }
        Ok(())
    }
}

/// Process a whole compiler request: one output file per generated unit that
/// declares at least one service. Any failure aborts the entire run; a
/// half-emitted stub is worse than no stub.
pub fn generate(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse, Error> {
    let options = Options::parse(request.parameter.as_deref())?;
    let plugin = LbClientPlugin::new(&options);

    let pool = DescriptorPool::from_file_descriptor_set(FileDescriptorSet {
        file: request.proto_file.clone(),
    })?;
    let resolver = PoolResolver::new(pool);

    let mut response = CodeGeneratorResponse {
        supported_features: Some(code_generator_response::Feature::Proto3Optional as u64),
        ..Default::default()
    };

    for name in &request.file_to_generate {
        let file = request
            .proto_file
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::MissingFile(name.clone()))?;
        if file.service.is_empty() {
            continue;
        }

        let mut buf = String::new();
        plugin.generate_imports(file, &mut buf)?;
        plugin.generate_body(file, &resolver, &mut buf)?;

        response.file.push(code_generator_response::File {
            name: Some(output_name(name)),
            content: Some(buf),
            ..Default::default()
        });
    }

    Ok(response)
}

fn output_name(proto_name: &str) -> String {
    let stem = proto_name.strip_suffix(".proto").unwrap_or(proto_name);
    format!("{stem}.lb.rs")
}
