// protoc-gen-lbclient/src/lib.rs

//! protoc plugin that generates discovery-backed, load-balanced gRPC client
//! stubs.
//!
//! For every service in a compilation unit the generator emits a client
//! handle whose channel is created once per process: the service name is
//! registered with a discovery registry at a fixed endpoint address and the
//! connection balances requests round-robin across the resolved backends.
//! Each RPC becomes a forwarding method that delegates to the underlying
//! transport client with the same request and response types.
//!
//! Generated files are meant to be `include!`d next to the message codegen
//! output for the same package, so same-package type names resolve bare and
//! cross-package names resolve through `super::`.

use thiserror::Error as ThisError;

pub mod names;
pub mod plugin;
pub mod render;
pub mod resolver;
pub mod spec;

pub use plugin::{generate, LbClientPlugin, Options};

/// Errors that abort a generation run. No partial output is ever produced;
/// every variant is fatal for the whole invocation.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A method references a type the descriptor set does not define.
    #[error("unresolved type reference `{0}`")]
    UnresolvedType(String),

    /// A rendered block failed to re-parse as Rust. The template is fixed,
    /// so this indicates a defect in the generator, not bad input.
    #[error("generated block is not valid Rust: {0}")]
    Template(#[from] syn::Error),

    /// Unknown or malformed entry in the plugin parameter string.
    #[error("invalid plugin parameter `{0}`")]
    InvalidParameter(String),

    /// The host asked us to generate a file it supplied no descriptor for.
    #[error("file `{0}` missing from the descriptor set")]
    MissingFile(String),

    /// The request's descriptor graph was rejected by the descriptor pool.
    #[error("invalid descriptor set: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),
}
