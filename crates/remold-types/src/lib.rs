//! Java type attribution model.
//!
//! Resolved types form a graph of [`JavaType`] nodes stored in a
//! [`TypeCache`] arena and addressed by [`TypeId`]. The graph may be cyclic
//! (a class whose method returns the class, a type variable bounded by
//! itself); producers build it with a reserve-then-patch protocol so that
//! construction always terminates. Every node has a canonical signature
//! string, and two nodes are the same type iff their signatures are equal.

#![forbid(unsafe_code)]

mod cache;
mod flags;
mod mapping;
mod model;
pub mod signature;

pub use cache::{Reservation, TypeCache};
pub use flags::{Flag, Flags};
pub use mapping::TypeMapping;
pub use model::{
    ArrayType, ClassKind, ClassType, GenericTypeVariable, JavaType, MethodType,
    ParameterizedType, Primitive, ShallowClass, TypeId, Variance, VariableType,
};

/// Name given to constructors in method types.
pub const CONSTRUCTOR_NAME: &str = "<constructor>";

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
