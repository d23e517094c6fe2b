//! Transformation strategy trait.
//!
//! A strategy is one unit of rewriting logic. The driver applies every
//! registered strategy, in registration order, to every compiled type it
//! resolves, top-level and nested alike. Order only matters if strategies
//! interact; the registry preserves it either way.

use crate::error::TransformError;
use crate::model::CompiledType;

/// A unit of rewriting logic applied to one compiled type at a time.
///
/// # Contract
///
/// - **No hidden state**: an implementation mutates nothing but the passed
///   type.
/// - **Idempotent**: the driver may hand the same logical type to a strategy
///   more than once across a nested-type traversal (it should not happen, but
///   implementations must not assume single invocation). Re-applying to an
///   already transformed type must be a no-op.
/// - **Fail fast**: any error returned aborts the entire pass; mutations
///   already applied to the type are retained.
pub trait TransformStrategy {
    /// Apply this strategy's rewrites to `class`.
    fn apply(&self, class: &mut CompiledType) -> Result<(), TransformError>;

    /// Short name used for log attribution.
    fn name(&self) -> &'static str;
}
