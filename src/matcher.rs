//! Separator-aware package-prefix matching for annotation type names.
//!
//! Elevation is triggered by annotations living in a fixed set of
//! dependency-injection and lifecycle packages. A name qualifies only if it
//! starts with a configured prefix *immediately followed by a dot*:
//! `jakarta.inject.Inject` matches the prefix `jakarta.inject`, while
//! `jakarta.injectable.Foo` does not. A naive substring test would over-match
//! sibling packages.

/// Annotation packages that mark members for elevation, fixed at build time.
///
/// DI and lifecycle namespaces (current and legacy) plus the container
/// namespace of the target framework.
pub const DI_ANNOTATION_PACKAGES: &[&str] = &[
    "jakarta.inject",
    "jakarta.annotation",
    "jakarta.decorator",
    "jakarta.enterprise",
    "javax.annotation",
    "io.quarkus.arc",
];

// ============================================================================
// PackagePrefixSet
// ============================================================================

/// An ordered set of package prefixes with separator-aware matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePrefixSet {
    prefixes: Vec<String>,
}

impl PackagePrefixSet {
    /// Create a set from arbitrary prefixes.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PackagePrefixSet {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// The build-time default set: [`DI_ANNOTATION_PACKAGES`].
    pub fn di_defaults() -> Self {
        PackagePrefixSet::new(DI_ANNOTATION_PACKAGES.iter().copied())
    }

    /// The configured prefixes, in registration order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Whether `type_name` lives under any configured package prefix.
    ///
    /// `type_name` must continue past the prefix with a `.` separator; a name
    /// exactly equal to a prefix names a package, not an annotation type, and
    /// does not match.
    pub fn matches(&self, type_name: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| prefix_matches(type_name, prefix))
    }
}

fn prefix_matches(type_name: &str, prefix: &str) -> bool {
    type_name
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('.'))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_annotation_inside_configured_package() {
        let set = PackagePrefixSet::di_defaults();
        assert!(set.matches("jakarta.inject.Inject"));
        assert!(set.matches("javax.annotation.PostConstruct"));
        assert!(set.matches("io.quarkus.arc.Unremovable"));
    }

    #[test]
    fn matches_subpackages_of_configured_package() {
        let set = PackagePrefixSet::di_defaults();
        assert!(set.matches("jakarta.enterprise.context.ApplicationScoped"));
    }

    #[test]
    fn sibling_package_with_shared_spelling_does_not_match() {
        let set = PackagePrefixSet::di_defaults();
        assert!(!set.matches("jakarta.injectable.Marker"));
        assert!(!set.matches("jakarta.annotations.Fake"));
    }

    #[test]
    fn name_equal_to_prefix_does_not_match() {
        let set = PackagePrefixSet::di_defaults();
        assert!(!set.matches("jakarta.inject"));
    }

    #[test]
    fn unrelated_package_does_not_match() {
        let set = PackagePrefixSet::di_defaults();
        assert!(!set.matches("com.example.Inject"));
        assert!(!set.matches("org.junit.jupiter.api.Test"));
    }

    #[test]
    fn empty_name_does_not_match() {
        let set = PackagePrefixSet::di_defaults();
        assert!(!set.matches(""));
    }

    #[test]
    fn custom_prefix_set() {
        let set = PackagePrefixSet::new(["com.acme.di"]);
        assert!(set.matches("com.acme.di.Wire"));
        assert!(!set.matches("jakarta.inject.Inject"));
        assert_eq!(set.prefixes().len(), 1);
        assert_eq!(set.prefixes()[0], "com.acme.di");
    }
}
