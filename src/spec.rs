// protoc-gen-lbclient/src/spec.rs

use prost_types::ServiceDescriptorProto;

use crate::names::camel_case;
use crate::resolver::TypeNameResolver;
use crate::Error;

/// Template-ready description of one RPC service: its normalized name and
/// its methods in declaration order. Built fresh per service, handed to the
/// renderer, and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub service_name: String,
    pub methods: Vec<ServiceMethodSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMethodSpec {
    pub method_name: String,
    pub input_type: String,
    pub output_type: String,
}

/// Build the normalized spec for one service descriptor.
///
/// Method order mirrors declaration order exactly; nothing is skipped or
/// merged. Both message references are resolved through `resolver` relative
/// to the unit's `package`; an unresolvable reference aborts the unit.
pub fn build_service_spec(
    svc: &ServiceDescriptorProto,
    package: &str,
    resolver: &dyn TypeNameResolver,
) -> Result<ServiceSpec, Error> {
    let mut methods = Vec::with_capacity(svc.method.len());
    for method in &svc.method {
        methods.push(ServiceMethodSpec {
            method_name: camel_case(method.name()),
            input_type: resolver.resolve(method.input_type(), package)?,
            output_type: resolver.resolve(method.output_type(), package)?,
        });
    }

    Ok(ServiceSpec {
        service_name: camel_case(svc.name()),
        methods,
    })
}
