//! Publify: annotation-driven visibility rewriting for compiled class files.
//!
//! Publify rewrites compiled type definitions on disk so that reflection and
//! proxy tooling can reach members the source kept hidden: fields and methods
//! carrying dependency-injection or lifecycle annotations, and no-argument
//! constructors, are elevated to public visibility. Nothing else changes:
//! no members are added or removed, no code is instrumented, and every
//! modifier bit outside the visibility sub-field is preserved verbatim.
//!
//! The engine is built from four pieces:
//!
//! - a mutable in-memory model of a compiled type ([`model`])
//! - a pluggable type pool that owns the binary format ([`pool`])
//! - an ordered registry of transformation strategies ([`strategy`],
//!   [`publicify`])
//! - a driver that walks a build-output directory and writes back only the
//!   types that were actually mutated ([`driver`])
//!
//! A pass is synchronous and sequential, and aborts on the first error; types
//! already written back stay rewritten.
//!
//! ```
//! use publify::{CompiledType, Driver, MemoryPool};
//! use publify::flags::{AccessFlags, ACC_PRIVATE};
//! use publify::model::{Annotation, Field};
//! use publify::pool::TypePool;
//!
//! let dir = tempfile::tempdir().unwrap();
//!
//! // Seed one artifact the way a build would have left it.
//! let mut seeder = MemoryPool::new();
//! seeder.insert(
//!     CompiledType::new("com.example.Service")
//!         .with_superclass("java.lang.Object")
//!         .with_field(
//!             Field::new("repo", "Lcom/example/Repo;", AccessFlags::new(ACC_PRIVATE))
//!                 .with_annotation(Annotation::new("jakarta.inject.Inject")),
//!         ),
//! );
//! seeder.commit("com.example.Service", dir.path()).unwrap();
//!
//! // One pass elevates the annotated field and rewrites the artifact.
//! let mut pool = MemoryPool::with_search_paths([dir.path()]);
//! let summary = Driver::new().run(&mut pool, dir.path()).unwrap();
//! assert_eq!(summary.classes_examined, 1);
//! ```

pub mod driver;
pub mod error;
pub mod flags;
pub mod matcher;
pub mod model;
pub mod pool;
pub mod publicify;
pub mod strategy;

pub use driver::{discover_class_names, Driver, PassSummary};
pub use error::TransformError;
pub use flags::{AccessFlags, Visibility};
pub use matcher::PackagePrefixSet;
pub use model::CompiledType;
pub use pool::{MemoryPool, TypePool};
pub use publicify::PublicifyStrategy;
pub use strategy::TransformStrategy;
