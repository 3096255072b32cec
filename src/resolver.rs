// protoc-gen-lbclient/src/resolver.rs

use prost_reflect::DescriptorPool;

use crate::names::{sanitize_ident, snake_case};
use crate::Error;

/// Maps a descriptor type reference to the Rust path generated code uses.
///
/// References arrive the way they appear in a `MethodDescriptorProto`, fully
/// qualified with a leading dot (`.shop.orders.GetOrderReq`). `package` is
/// the proto package of the compilation unit being generated, so the returned
/// path is relative to the module that unit's code lives in.
pub trait TypeNameResolver {
    fn resolve(&self, type_ref: &str, package: &str) -> Result<String, Error>;
}

/// Resolver backed by a `DescriptorPool` built from the compiler request.
pub struct PoolResolver {
    pool: DescriptorPool,
}

impl PoolResolver {
    pub fn new(pool: DescriptorPool) -> Self {
        Self { pool }
    }
}

impl TypeNameResolver for PoolResolver {
    fn resolve(&self, type_ref: &str, package: &str) -> Result<String, Error> {
        let full_name = type_ref.trim_start_matches('.');
        let message = self
            .pool
            .get_message_by_name(full_name)
            .ok_or_else(|| Error::UnresolvedType(type_ref.to_string()))?;

        Ok(rust_path(
            message.parent_file().package_name(),
            message.full_name(),
            package,
        ))
    }
}

/// Compute the Rust path for a message as seen from code generated into the
/// module for `package`. Same-package types collapse to their in-module path
/// (`GetOrderReq`, or `outer::Inner` for nested messages); foreign types
/// climb with `super::` to the deepest shared package ancestor and descend
/// from there, matching how the message codegen nests package modules.
fn rust_path(msg_package: &str, full_name: &str, package: &str) -> String {
    let msg_segs: Vec<&str> = msg_package.split('.').filter(|s| !s.is_empty()).collect();
    let cur_segs: Vec<&str> = package.split('.').filter(|s| !s.is_empty()).collect();

    let mut shared = 0;
    while shared < msg_segs.len() && shared < cur_segs.len() && msg_segs[shared] == cur_segs[shared]
    {
        shared += 1;
    }

    let mut parts: Vec<String> = Vec::new();
    for _ in shared..cur_segs.len() {
        parts.push("super".to_string());
    }
    for seg in &msg_segs[shared..] {
        parts.push(sanitize_ident(seg));
    }

    let relative = if msg_package.is_empty() {
        full_name
    } else {
        &full_name[msg_package.len() + 1..]
    };
    let nested: Vec<&str> = relative.split('.').collect();
    for (i, seg) in nested.iter().enumerate() {
        if i + 1 == nested.len() {
            parts.push(seg.to_string());
        } else {
            // Parent messages become snake_case modules.
            parts.push(sanitize_ident(&snake_case(seg)));
        }
    }

    parts.join("::")
}

#[cfg(test)]
mod tests {
    use prost_types::{DescriptorProto, FileDescriptorProto, FileDescriptorSet};

    use super::*;

    fn message(name: &str) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn pool() -> DescriptorPool {
        let orders = FileDescriptorProto {
            name: Some("shop/orders.proto".to_string()),
            package: Some("shop.orders".to_string()),
            syntax: Some("proto3".to_string()),
            message_type: vec![
                message("GetOrderReq"),
                DescriptorProto {
                    name: Some("Envelope".to_string()),
                    nested_type: vec![message("Payload")],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let common = FileDescriptorProto {
            name: Some("shop/common.proto".to_string()),
            package: Some("shop.common".to_string()),
            syntax: Some("proto3".to_string()),
            message_type: vec![message("Money")],
            ..Default::default()
        };
        DescriptorPool::from_file_descriptor_set(FileDescriptorSet {
            file: vec![orders, common],
        })
        .expect("descriptor set should be valid")
    }

    #[test]
    fn same_package_types_collapse_to_bare_names() {
        let resolver = PoolResolver::new(pool());
        let path = resolver
            .resolve(".shop.orders.GetOrderReq", "shop.orders")
            .unwrap();
        assert_eq!(path, "GetOrderReq");
    }

    #[test]
    fn nested_messages_go_through_snake_case_modules() {
        let resolver = PoolResolver::new(pool());
        let path = resolver
            .resolve(".shop.orders.Envelope.Payload", "shop.orders")
            .unwrap();
        assert_eq!(path, "envelope::Payload");
    }

    #[test]
    fn cross_package_types_climb_to_the_shared_ancestor() {
        let resolver = PoolResolver::new(pool());
        let path = resolver
            .resolve(".shop.common.Money", "shop.orders")
            .unwrap();
        assert_eq!(path, "super::common::Money");
    }

    #[test]
    fn unknown_types_are_a_resolution_failure() {
        let resolver = PoolResolver::new(pool());
        let err = resolver
            .resolve(".shop.orders.Missing", "shop.orders")
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedType(_)));
    }
}
