//! Error types for the transformation engine.
//!
//! This module provides a unified error type ([`TransformError`]) covering
//! every failure mode of a transformation pass. All variants are fatal to the
//! pass: the driver surfaces the first error to the caller immediately, with
//! no local recovery, retry, or partial-completion reporting. Mutations
//! already applied to the in-flight type (and types already written back) are
//! retained; there is no rollback.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for a transformation pass.
///
/// Each variant carries enough context to report the failure as a hard build
/// error, including the type name being processed and the underlying cause.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A discovered name could not be resolved to a valid compiled type
    /// (missing artifact, undecodable content, unresolvable supertype).
    #[error("cannot resolve type '{name}': {reason}")]
    TypeResolution { name: String, reason: String },

    /// A member's annotations could not be enumerated or resolved.
    #[error("cannot resolve annotations on {member} of '{type_name}': {reason}")]
    AnnotationResolution {
        type_name: String,
        member: String,
        reason: String,
    },

    /// The in-memory model violates a structural invariant.
    #[error("malformed type '{name}': {reason}")]
    MalformedType { name: String, reason: String },

    /// Write-back of a mutated type failed.
    #[error("cannot write '{name}' back to {}", .path.display())]
    Persistence {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Enumerating candidate class files under the root directory failed.
    #[error("cannot scan class directory {}", .root.display())]
    Scan {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl TransformError {
    /// Create a type-resolution error.
    pub fn type_resolution(name: impl Into<String>, reason: impl Into<String>) -> Self {
        TransformError::TypeResolution {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an annotation-resolution error.
    pub fn annotation_resolution(
        type_name: impl Into<String>,
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TransformError::AnnotationResolution {
            type_name: type_name.into(),
            member: member.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed-type error.
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        TransformError::MalformedType {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a persistence error.
    pub fn persistence(name: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        TransformError::Persistence {
            name: name.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a directory-scan error.
    pub fn scan(root: &Path, source: io::Error) -> Self {
        TransformError::Scan {
            root: root.to_path_buf(),
            source,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_resolution_display() {
        let err = TransformError::type_resolution("com.example.Foo", "not found on any search path");
        assert_eq!(
            err.to_string(),
            "cannot resolve type 'com.example.Foo': not found on any search path"
        );
    }

    #[test]
    fn annotation_resolution_display() {
        let err = TransformError::annotation_resolution(
            "com.example.Foo",
            "field 'bar'",
            "descriptor has no resolvable type name",
        );
        assert_eq!(
            err.to_string(),
            "cannot resolve annotations on field 'bar' of 'com.example.Foo': \
             descriptor has no resolvable type name"
        );
    }

    #[test]
    fn malformed_type_display() {
        let err = TransformError::malformed("com.example.Foo", "field index 9 out of range");
        assert_eq!(
            err.to_string(),
            "malformed type 'com.example.Foo': field index 9 out of range"
        );
    }

    #[test]
    fn persistence_display_includes_path() {
        let err = TransformError::persistence(
            "com.example.Foo",
            "/tmp/classes/com/example/Foo.class",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("com.example.Foo"));
        assert!(rendered.contains("/tmp/classes/com/example/Foo.class"));
    }

    #[test]
    fn scan_chains_io_source() {
        let err = TransformError::scan(
            Path::new("/tmp/classes"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        let source = std::error::Error::source(&err).expect("scan error carries a source");
        assert_eq!(source.to_string(), "gone");
    }
}
