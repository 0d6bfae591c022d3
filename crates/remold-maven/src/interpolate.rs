use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::coordinates::Exclusion;
use crate::pom::Dependency;

const MAX_INTERPOLATION_DEPTH: usize = 32;
/// Longer expansions of one property are kept as the placeholder.
const MAX_EXPANDED_LEN: usize = 64 * 1024;

/// `${...}` expansion for one POM.
///
/// Lookup order: user properties, reserved `project.*`/`pom.*` values,
/// `env.*`, then model properties (child over parent).
pub(crate) struct Interpolator<'a> {
    pub(crate) overrides: &'a BTreeMap<String, String>,
    pub(crate) reserved: BTreeMap<String, String>,
    pub(crate) environment: &'a BTreeMap<String, String>,
    pub(crate) model: &'a BTreeMap<String, String>,
}

#[derive(Default)]
struct Expansion {
    /// Properties being expanded, outermost first.
    stack: Vec<String>,
    done: HashMap<String, String>,
}

impl Interpolator<'_> {
    pub(crate) fn lookup(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.overrides.get(key) {
            return Some(value);
        }
        if let Some(value) = self.reserved.get(key) {
            return Some(value);
        }
        if let Some(name) = key.strip_prefix("env.") {
            if let Some(value) = self.environment.get(name) {
                return Some(value);
            }
        }
        self.model.get(key).map(String::as_str)
    }

    /// Unresolved placeholders are kept verbatim, and so are references back
    /// to a property that is still being expanded.
    pub(crate) fn interpolate(&self, text: &str) -> String {
        self.expand(text, &mut Expansion::default())
    }

    pub(crate) fn interpolate_opt(&self, text: Option<&String>) -> Option<String> {
        text.map(|text| self.interpolate(text))
    }

    fn expand(&self, text: &str, state: &mut Expansion) -> String {
        if !text.contains("${") {
            return text.to_owned();
        }

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

        re.replace_all(text, |caps: &regex::Captures<'_>| {
            self.expand_property(&caps[1], state)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
    }

    fn expand_property(&self, key: &str, state: &mut Expansion) -> Option<String> {
        if let Some(done) = state.done.get(key) {
            return Some(done.clone());
        }
        let Some(value) = self.lookup(key) else {
            tracing::debug!(target: "remold.maven", property = key, "unresolved property");
            return None;
        };
        if state.stack.iter().any(|open| open == key) {
            tracing::debug!(target: "remold.maven", property = key, "recursive property reference; kept verbatim");
            return None;
        }
        if state.stack.len() >= MAX_INTERPOLATION_DEPTH {
            tracing::debug!(target: "remold.maven", property = key, "property expansion too deep; kept verbatim");
            return None;
        }

        state.stack.push(key.to_owned());
        let mut expanded = self.expand(value, state);
        state.stack.pop();
        if expanded.len() > MAX_EXPANDED_LEN {
            tracing::debug!(target: "remold.maven", property = key, len = expanded.len(), "property expansion too long; kept verbatim");
            expanded = format!("${{{key}}}");
        }
        state.done.insert(key.to_owned(), expanded.clone());
        Some(expanded)
    }

    pub(crate) fn dependency(&self, dependency: &Dependency) -> Dependency {
        Dependency {
            group_id: self.interpolate(&dependency.group_id),
            artifact_id: self.interpolate(&dependency.artifact_id),
            version: self.interpolate_opt(dependency.version.as_ref()),
            classifier: self.interpolate_opt(dependency.classifier.as_ref()),
            type_: self.interpolate_opt(dependency.type_.as_ref()),
            scope: self.interpolate_opt(dependency.scope.as_ref()),
            optional: dependency.optional,
            exclusions: dependency
                .exclusions
                .iter()
                .map(|e| Exclusion::new(self.interpolate(&e.group_id), self.interpolate(&e.artifact_id)))
                .collect(),
        }
    }
}
