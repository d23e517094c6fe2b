//! Visibility-elevation strategy.
//!
//! Elevates to public:
//! - every declared field carrying at least one qualifying annotation
//! - every declared method carrying at least one qualifying annotation
//! - every declared no-argument constructor, unconditionally (no annotation
//!   check)
//!
//! Elevation is monotonic: an already-public member is left untouched and
//! does not mark the type modified. Members are decided and mutated one at a
//! time, in declaration order (fields, then methods, then constructors), so
//! when a later member fails the elevations already applied are retained.

use tracing::debug;

use crate::error::TransformError;
use crate::matcher::PackagePrefixSet;
use crate::model::{Annotation, CompiledType};
use crate::strategy::TransformStrategy;

// ============================================================================
// PublicifyStrategy
// ============================================================================

/// Annotation-driven visibility elevation.
#[derive(Debug, Clone)]
pub struct PublicifyStrategy {
    packages: PackagePrefixSet,
}

impl PublicifyStrategy {
    /// Strategy with the build-time default qualifying packages
    /// ([`crate::matcher::DI_ANNOTATION_PACKAGES`]).
    pub fn new() -> Self {
        PublicifyStrategy {
            packages: PackagePrefixSet::di_defaults(),
        }
    }

    /// Strategy with a custom qualifying-package set.
    pub fn with_packages(packages: PackagePrefixSet) -> Self {
        PublicifyStrategy { packages }
    }

    /// Whether any of `annotations` lives under a qualifying package.
    ///
    /// A descriptor with no resolvable type name is an error, not a skip:
    /// silently ignoring it could leave a member the caller relies on at its
    /// original visibility.
    fn qualifies(
        &self,
        type_name: &str,
        member: &str,
        annotations: &[Annotation],
    ) -> Result<bool, TransformError> {
        for annotation in annotations {
            if annotation.type_name().is_empty() {
                return Err(TransformError::annotation_resolution(
                    type_name,
                    member,
                    "descriptor has no resolvable type name",
                ));
            }
            if self.packages.matches(annotation.type_name()) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for PublicifyStrategy {
    fn default() -> Self {
        PublicifyStrategy::new()
    }
}

impl TransformStrategy for PublicifyStrategy {
    fn apply(&self, class: &mut CompiledType) -> Result<(), TransformError> {
        // Fields with a qualifying annotation.
        for index in 0..class.fields().len() {
            let elevate = {
                let field = &class.fields()[index];
                self.qualifies(
                    class.name(),
                    &format!("field '{}'", field.name),
                    &field.annotations,
                )?
            };
            if elevate {
                class.ensure_mutable();
                if class.publicize_field(index)? {
                    debug!(class = class.name(), field = index, "elevated field");
                }
            }
        }

        // Methods with a qualifying annotation.
        for index in 0..class.methods().len() {
            let elevate = {
                let method = &class.methods()[index];
                self.qualifies(
                    class.name(),
                    &format!("method '{}'", method.name),
                    &method.annotations,
                )?
            };
            if elevate {
                class.ensure_mutable();
                if class.publicize_method(index)? {
                    debug!(class = class.name(), method = index, "elevated method");
                }
            }
        }

        // No-argument constructors, unconditionally.
        for index in 0..class.constructors().len() {
            let elevate = {
                let constructor = &class.constructors()[index];
                if constructor
                    .parameter_types
                    .iter()
                    .any(|param| param.is_empty())
                {
                    return Err(TransformError::malformed(
                        class.name(),
                        format!("constructor {index} has an undecodable parameter descriptor"),
                    ));
                }
                constructor.is_zero_arg()
            };
            if elevate {
                class.ensure_mutable();
                if class.publicize_constructor(index)? {
                    debug!(class = class.name(), "elevated no-argument constructor");
                }
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "publicify"
    }
}

// ============================================================================
// Tests
// ============================================================================
