//! JVM descriptor and generic signature grammar.
//!
//! Runtime reflection exposes generic type information as the `Signature`
//! attribute strings defined in JVMS 4.7.9.1. This crate parses those strings
//! (and plain descriptors, used when no signature is present) into small
//! trees that the reflection type mapping walks.

#![forbid(unsafe_code)]

pub mod access;
mod descriptor;
mod error;
mod signature;

pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    ClassTypeSignature, MethodSignature, SimpleClassTypeSignature, TypeArgument, TypeParameter,
    TypeSignature,
};

/// Convert an internal name (`java/util/Map$Entry`) into a binary name
/// (`java.util.Map$Entry`).
pub fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}
