// protoc-gen-lbclient/src/render.rs

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::names::{sanitize_ident, snake_case};
use crate::spec::ServiceSpec;
use crate::Error;

/// Registry endpoint baked into generated code unless the plugin parameter
/// overrides it (`registry_addr=http://…`).
pub const DEFAULT_REGISTRY_ADDR: &str = "http://127.0.0.1:8500";

/// Renders the fixed client-stub template against a [`ServiceSpec`].
///
/// Rendering is a pure function of the options and the spec; identical inputs
/// produce byte-identical text. Every rendered block is a self-contained set
/// of items that parses on its own, so the adapter can append blocks to a
/// unit's buffer in any combination.
pub struct Renderer {
    registry_addr: String,
}

impl Renderer {
    pub fn new(registry_addr: impl Into<String>) -> Self {
        Self {
            registry_addr: registry_addr.into(),
        }
    }

    /// The dependency block every generated unit needs: the discovery
    /// registry, the balancer, and the transport channel type. Emitted once
    /// per compilation unit, ahead of the service blocks.
    pub fn render_imports(&self) -> Result<String, Error> {
        format_block(quote! {
            use std::sync::OnceLock;

            use grpc_lb::balancer::RoundRobin;
            use grpc_lb::registry::consul::ConsulRegistry;
            use grpc_lb::ManagedChannel;
            use tonic::transport::Channel;
        })
    }

    /// Render one self-contained client block for `spec`: the service-name
    /// constant, the once-per-process channel initialization, the client
    /// handle, and one forwarding method per spec entry, in order.
    pub fn render(&self, spec: &ServiceSpec) -> Result<String, Error> {
        let service_name = spec.service_name.as_str();
        let snake = snake_case(service_name);

        let client_ident = format_ident!("{}Client", service_name);
        let name_const = format_ident!("{}_NAME", snake.to_uppercase());
        let channel_static = format_ident!("{}_CHANNEL", snake.to_uppercase());
        let channel_fn = format_ident!("{}_channel", snake);
        let transport_mod = format_ident!("{}_client", snake);
        let registry_addr = self.registry_addr.as_str();

        let methods = spec
            .methods
            .iter()
            .map(|m| {
                let method_ident = format_ident!("{}", m.method_name);
                let delegate = format_ident!("{}", sanitize_ident(&snake_case(&m.method_name)));
                let input = parse_type_path(&m.input_type)?;
                let output = parse_type_path(&m.output_type)?;

                Ok(quote! {
                    #[allow(non_snake_case)]
                    pub async fn #method_ident(
                        &mut self,
                        request: tonic::Request<#input>,
                    ) -> Result<tonic::Response<#output>, tonic::Status> {
                        self.inner.#delegate(request).await
                    }
                })
            })
            .collect::<Result<Vec<TokenStream>, Error>>()?;

        format_block(quote! {
            pub const #name_const: &str = #service_name;

            static #channel_static: OnceLock<Channel> = OnceLock::new();

            /// Shared channel for the service, registered with the discovery
            /// registry on first use and balanced round-robin across the
            /// resolved backends.
            fn #channel_fn() -> Channel {
                #channel_static
                    .get_or_init(|| {
                        let registry = ConsulRegistry::with_address(#registry_addr);
                        ManagedChannel::builder(#name_const)
                            .registry(registry)
                            .balancer(RoundRobin)
                            .connect_lazy()
                    })
                    .clone()
            }

            #[derive(Clone)]
            pub struct #client_ident {
                inner: #transport_mod::#client_ident<Channel>,
            }

            impl Default for #client_ident {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl #client_ident {
                pub fn new() -> Self {
                    Self {
                        inner: #transport_mod::#client_ident::new(#channel_fn()),
                    }
                }

                #(#methods)*
            }
        })
    }
}

fn parse_type_path(path: &str) -> Result<syn::Path, Error> {
    // The resolver only hands out valid paths; a failure here is a defect in
    // the generator, not in the input.
    Ok(syn::parse_str(path)?)
}

fn format_block(tokens: TokenStream) -> Result<String, Error> {
    let file = syn::parse2(tokens)?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use crate::spec::ServiceMethodSpec;

    use super::*;

    fn order_spec() -> ServiceSpec {
        ServiceSpec {
            service_name: "OrderService".to_string(),
            methods: vec![
                ServiceMethodSpec {
                    method_name: "GetOrder".to_string(),
                    input_type: "GetOrderReq".to_string(),
                    output_type: "GetOrderResp".to_string(),
                },
                ServiceMethodSpec {
                    method_name: "ListOrders".to_string(),
                    input_type: "ListOrdersReq".to_string(),
                    output_type: "ListOrdersResp".to_string(),
                },
            ],
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(DEFAULT_REGISTRY_ADDR)
    }

    #[test]
    fn renders_the_order_service_scenario() {
        let out = renderer().render(&order_spec()).unwrap();

        assert!(out.contains("pub struct OrderServiceClient"));
        assert!(out.contains("pub const ORDER_SERVICE_NAME: &str = \"OrderService\";"));
        assert!(out.contains("pub async fn GetOrder"));
        assert!(out.contains("tonic::Request<GetOrderReq>"));
        assert!(out.contains("tonic::Response<GetOrderResp>"));
        assert!(out.contains("self.inner.get_order(request).await"));
    }

    #[test]
    fn forwarding_methods_keep_declaration_order() {
        let out = renderer().render(&order_spec()).unwrap();
        let get = out.find("pub async fn GetOrder").unwrap();
        let list = out.find("pub async fn ListOrders").unwrap();
        assert!(get < list);
    }

    #[test]
    fn method_blocks_repeat_once_per_spec_entry() {
        let out = renderer().render(&order_spec()).unwrap();
        assert_eq!(out.matches("pub async fn").count(), 2);
    }

    #[test]
    fn rendering_is_deterministic() {
        let spec = order_spec();
        assert_eq!(
            renderer().render(&spec).unwrap(),
            renderer().render(&spec).unwrap()
        );
    }

    #[test]
    fn empty_service_renders_initialization_only() {
        let spec = ServiceSpec {
            service_name: "PingService".to_string(),
            methods: Vec::new(),
        };
        let out = renderer().render(&spec).unwrap();

        assert!(out.contains("static PING_SERVICE_CHANNEL"));
        assert!(out.contains("pub struct PingServiceClient"));
        assert!(!out.contains("pub async fn"));
        syn::parse_file(&out).expect("empty-service block should still be well-formed");
    }

    #[test]
    fn rendered_blocks_parse_standalone() {
        let r = renderer();
        syn::parse_file(&r.render_imports().unwrap()).expect("import block should parse");
        syn::parse_file(&r.render(&order_spec()).unwrap()).expect("service block should parse");
    }

    #[test]
    fn registry_address_is_configurable() {
        let out = Renderer::new("http://consul.internal:8500")
            .render(&order_spec())
            .unwrap();
        assert!(out.contains("\"http://consul.internal:8500\""));
        assert!(!out.contains(DEFAULT_REGISTRY_ADDR));
    }

    #[test]
    fn cross_package_paths_render_verbatim() {
        let spec = ServiceSpec {
            service_name: "QuoteService".to_string(),
            methods: vec![ServiceMethodSpec {
                method_name: "Convert".to_string(),
                input_type: "super::common::Money".to_string(),
                output_type: "super::common::Money".to_string(),
            }],
        };
        let out = renderer().render(&spec).unwrap();
        assert!(out.contains("tonic::Request<super::common::Money>"));
    }
}
