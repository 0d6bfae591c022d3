//! Producers of attributed Java types.
//!
//! [`CompilerTypeMapping`] walks compiler-attributed symbols and
//! [`ReflectionTypeMapping`] walks runtime class descriptions. The two share
//! nothing but the [`remold_types::TypeCache`] they intern into, and must
//! agree on every signature they produce.

#![forbid(unsafe_code)]

mod compiler;
mod reflection;

pub use compiler::{
    AnnotationMirror, ClassSymbol, CompilerTypeMapping, MethodSymbol, Retention, SymbolId,
    SymbolTable, TypeMirror, TypeVarSymbol, VariableSymbol, WildcardKind,
};
pub use reflection::{
    ReflectionAccess, ReflectionTypeMapping, RuntimeClass, RuntimeField, RuntimeMethod,
};
