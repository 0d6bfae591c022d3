use std::collections::BTreeMap;

use crate::pom::{Activation, ActivationProperty, Profile};
use crate::version::{ComparableVersion, VersionRequirement};

/// Inputs for `<activation>` checks.
pub(crate) struct ActivationContext<'a> {
    /// Explicit ids; `!id` deactivates.
    pub(crate) explicit: &'a [String],
    pub(crate) jdk_version: Option<&'a str>,
    pub(crate) properties: &'a BTreeMap<String, String>,
    pub(crate) environment: &'a BTreeMap<String, String>,
}

impl ActivationContext<'_> {
    /// Active profiles of one POM, in declaration order.
    ///
    /// `activeByDefault` profiles apply only when no other profile of the
    /// same POM is active.
    pub(crate) fn active<'p>(&self, profiles: &'p [Profile]) -> Vec<&'p Profile> {
        let enabled = |profile: &Profile| !self.is_deactivated(profile.id.as_deref());
        let active: Vec<&Profile> = profiles
            .iter()
            .filter(|p| enabled(*p))
            .filter(|p| {
                self.is_explicit(p.id.as_deref()) || self.condition_matches(p.activation.as_ref())
            })
            .collect();
        if !active.is_empty() {
            return active;
        }
        profiles
            .iter()
            .filter(|p| enabled(*p))
            .filter(|p| p.activation.as_ref().is_some_and(|a| a.active_by_default))
            .collect()
    }

    fn is_explicit(&self, id: Option<&str>) -> bool {
        id.is_some_and(|id| self.explicit.iter().any(|e| e.trim() == id))
    }

    fn is_deactivated(&self, id: Option<&str>) -> bool {
        id.is_some_and(|id| {
            self.explicit
                .iter()
                .any(|e| e.trim().strip_prefix('!') == Some(id))
        })
    }

    /// All declared conditions must hold; none declared means inactive.
    fn condition_matches(&self, activation: Option<&Activation>) -> bool {
        let Some(activation) = activation else {
            return false;
        };
        if activation.jdk.is_none() && activation.property.is_none() {
            return false;
        }
        let jdk = activation.jdk.as_deref().map_or(true, |wanted| self.jdk_matches(wanted));
        let property = activation
            .property
            .as_ref()
            .map_or(true, |property| self.property_matches(property));
        jdk && property
    }

    fn jdk_matches(&self, wanted: &str) -> bool {
        let Some(jdk) = self.jdk_version else {
            return false;
        };
        let (negated, wanted) = match wanted.trim().strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, wanted.trim()),
        };
        let requirement = VersionRequirement::parse(wanted);
        let matched = if requirement.is_range() {
            requirement.matches(&ComparableVersion::parse(jdk))
        } else {
            jdk.starts_with(wanted)
        };
        matched != negated
    }

    fn property_matches(&self, property: &ActivationProperty) -> bool {
        let lookup = |name: &str| {
            self.properties
                .get(name)
                .or_else(|| self.environment.get(name))
        };
        let name = property.name.trim();
        if let Some(absent) = name.strip_prefix('!') {
            return lookup(absent).is_none();
        }
        match (lookup(name), property.value.as_deref()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => match expected.strip_prefix('!') {
                Some(unexpected) => actual != unexpected,
                None => actual == expected,
            },
        }
    }
}
