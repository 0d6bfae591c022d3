//! Canonical signature strings.
//!
//! | shape | signature |
//! |---|---|
//! | primitive | `int`, `void`, `String`, `null`, `none` |
//! | class | `org.example.C$Inner` |
//! | parameterized | `java.util.Map<java.lang.String, java.lang.Integer>` |
//! | type variable | `Generic{T}`, `Generic{T extends A & B}`, `Generic{? super A}` |
//! | array | `int[]` |
//! | method | `org.example.C{name=m,return=void,parameters=[int]}` |
//! | variable | `org.example.C{name=x,type=int}` |
//! | unknown | `{undefined}` |
//!
//! Producers use these helpers on their own source forms so that a signature
//! can be computed (and the cache consulted) before a node exists.

use crate::model::Variance;

pub const UNKNOWN: &str = "{undefined}";

pub fn parameterized(fqn: &str, arguments: &[String]) -> String {
    format!("{fqn}<{}>", arguments.join(", "))
}

/// Signature of a type variable or wildcard (`name == "?"`).
///
/// A variable that is already being built prints without bounds; callers
/// pass an empty `bounds` slice for that case.
pub fn generic(name: &str, variance: Variance, bounds: &[String]) -> String {
    if bounds.is_empty() {
        return format!("Generic{{{name}}}");
    }
    let keyword = match variance {
        Variance::Contravariant => "super",
        Variance::Covariant | Variance::Invariant => "extends",
    };
    format!("Generic{{{name} {keyword} {}}}", bounds.join(" & "))
}

pub fn array(element: &str) -> String {
    format!("{element}[]")
}

pub fn method(declaring: &str, name: &str, return_type: &str, parameters: &[String]) -> String {
    format!(
        "{declaring}{{name={name},return={return_type},parameters=[{}]}}",
        parameters.join(",")
    )
}

pub fn variable(owner: &str, name: &str, ty: &str) -> String {
    format!("{owner}{{name={name},type={ty}}}")
}
