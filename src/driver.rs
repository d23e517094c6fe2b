//! Transformation driver: one pass over a directory of compiled types.
//!
//! The driver discovers candidate class files under a root directory,
//! resolves each through a [`TypePool`], applies every registered
//! [`TransformStrategy`] to the type and to each of its nested types, and
//! writes back only representations whose modified flag is set.
//!
//! A pass is strictly sequential and aborts on the first error. Write-back is
//! not transactional across files: types committed before an abort stay
//! rewritten.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::TransformError;
use crate::model::CompiledType;
use crate::pool::TypePool;
use crate::publicify::PublicifyStrategy;
use crate::strategy::TransformStrategy;

/// File extension of compiled-type artifacts (matched case-insensitively).
pub const CLASS_FILE_EXTENSION: &str = "class";

/// Marker used in synthetic/nested-type file names. Paths containing it are
/// skipped by top-level discovery; those types are reached through their
/// enclosing type's nested-type list instead.
pub const NESTED_TYPE_MARKER: char = '$';

// ============================================================================
// Discovery
// ============================================================================

/// Enumerate fully-qualified type names under `root`.
///
/// Includes every regular file whose extension is the class-file suffix,
/// excluding any relative path containing [`NESTED_TYPE_MARKER`]. Names are
/// derived by replacing path separators with `.` and dropping the suffix.
/// A nonexistent root yields an empty list. Order is deterministic
/// (file-name sorted).
pub fn discover_class_names(root: &Path) -> Result<Vec<String>, TransformError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
            TransformError::scan(root, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_class_file = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CLASS_FILE_EXTENSION));
        if !is_class_file {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .map_err(|e| TransformError::scan(root, io::Error::other(e)))?;
        if relative.to_string_lossy().contains(NESTED_TYPE_MARKER) {
            continue;
        }

        let segments: Vec<String> = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        names.push(segments.join("."));
    }
    Ok(names)
}

// ============================================================================
// Pass Summary
// ============================================================================

/// Result of one completed transformation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    /// Number of types examined (top-level and nested), not the number
    /// written back.
    pub classes_examined: usize,
}

// ============================================================================
// Driver
// ============================================================================

/// Orchestrates a full pass: discovery, strategy application, write-back.
pub struct Driver {
    strategies: Vec<Box<dyn TransformStrategy>>,
}

impl Driver {
    /// Driver with the stock registry: the single [`PublicifyStrategy`].
    pub fn new() -> Self {
        Driver {
            strategies: vec![Box::new(PublicifyStrategy::new())],
        }
    }

    /// Driver with a caller-supplied registry, applied in the given order.
    pub fn with_strategies(strategies: Vec<Box<dyn TransformStrategy>>) -> Self {
        Driver { strategies }
    }

    /// Append a strategy to the registry.
    pub fn register(&mut self, strategy: Box<dyn TransformStrategy>) {
        self.strategies.push(strategy);
    }

    /// Run one pass over `class_dir`, resolving through `pool`.
    ///
    /// Every discovered top-level type and every nested type it reports is
    /// examined; a type is written back (in place, under `class_dir`) if and
    /// only if its modified flag is set. The first error aborts the pass.
    pub fn run(
        &self,
        pool: &mut dyn TypePool,
        class_dir: &Path,
    ) -> Result<PassSummary, TransformError> {
        let names = discover_class_names(class_dir)?;

        let mut classes_examined = 0;
        for name in &names {
            classes_examined += self.transform_type(pool, class_dir, name)?;
        }

        info!(
            classes = classes_examined,
            root = %class_dir.display(),
            "transformation pass complete"
        );
        Ok(PassSummary { classes_examined })
    }

    /// Transform one top-level type and its nested types. Returns the number
    /// of types examined.
    fn transform_type(
        &self,
        pool: &mut dyn TypePool,
        root: &Path,
        name: &str,
    ) -> Result<usize, TransformError> {
        pool.verify_hierarchy(name)?;
        let nested = {
            let class = pool.resolve(name)?;
            self.apply_strategies(class)?;
            class.nested_types().to_vec()
        };
        let mut examined = 1;

        // Nested types resolve and persist independently of their enclosing
        // type's modification state.
        for nested_name in &nested {
            pool.verify_hierarchy(nested_name)?;
            let modified = {
                let class = pool.resolve(nested_name)?;
                self.apply_strategies(class)?;
                class.is_modified()
            };
            if modified {
                debug!(class = nested_name.as_str(), "writing back nested type");
                pool.commit(nested_name, root)?;
            }
            examined += 1;
        }

        if pool.resolve(name)?.is_modified() {
            debug!(class = name, "writing back type");
            pool.commit(name, root)?;
        }
        Ok(examined)
    }

    fn apply_strategies(&self, class: &mut CompiledType) -> Result<(), TransformError> {
        for strategy in &self.strategies {
            debug!(
                class = class.name(),
                strategy = strategy.name(),
                "applying strategy"
            );
            strategy.apply(class)?;
        }
        Ok(())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
