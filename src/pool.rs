//! Type pool: name resolution, hierarchy checks, and write-back.
//!
//! The engine never parses the class-file binary format itself. A pool owns
//! that format: it resolves fully-qualified names to mutable [`CompiledType`]
//! representations, answers supertype-chain queries, and serializes mutated
//! representations back to storage.
//!
//! One pool instance lives for exactly one transformation pass. Within that
//! pass, repeated lookups of the same name must return the same cached
//! representation, so the nested-type traversal observes mutations applied
//! earlier in the pass.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TransformError;
use crate::model::CompiledType;

/// Name of the hierarchy root every legal type must chain up to.
pub const ROOT_TYPE: &str = "java.lang.Object";

// ============================================================================
// TypePool Trait
// ============================================================================

/// Resolution and persistence of compiled types.
///
/// Implementations own the on-disk binary format; the engine manipulates
/// types only through the model this trait hands out.
pub trait TypePool {
    /// Resolve a fully-qualified name to its cached mutable representation.
    ///
    /// Repeated lookups of one name within one pool must return the same
    /// representation (cache identity), never a fresh copy.
    fn resolve(&mut self, name: &str) -> Result<&mut CompiledType, TransformError>;

    /// Verify the named type's supertype chain resolves all the way up to
    /// [`ROOT_TYPE`]. A missing link or a cycle is a
    /// [`TransformError::TypeResolution`].
    fn verify_hierarchy(&mut self, name: &str) -> Result<(), TransformError>;

    /// Serialize the named type's current state under `root`, overwriting the
    /// artifact it was loaded from, then freeze the representation.
    fn commit(&mut self, name: &str, root: &Path) -> Result<(), TransformError>;
}

// ============================================================================
// MemoryPool
// ============================================================================

/// Reference pool backed by an in-memory cache and an ordered search path.
///
/// Types load lazily from the first search location containing the name's
/// class file and are stored as JSON documents of the model. Integrations
/// working against the real binary format supply their own [`TypePool`];
/// this one serves tests, tooling, and embedders that control their own
/// artifact format.
#[derive(Debug, Default)]
pub struct MemoryPool {
    search_paths: Vec<PathBuf>,
    types: HashMap<String, CompiledType>,
}

impl MemoryPool {
    /// Empty pool with no search locations.
    pub fn new() -> Self {
        MemoryPool::default()
    }

    /// Pool that resolves from `search_paths`, in order.
    pub fn with_search_paths<I, P>(search_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        MemoryPool {
            search_paths: search_paths.into_iter().map(Into::into).collect(),
            types: HashMap::new(),
        }
    }

    /// Seed the cache with an already-built representation.
    ///
    /// Replaces any cached representation of the same name.
    pub fn insert(&mut self, class: CompiledType) {
        self.types.insert(class.name().to_string(), class);
    }

    /// Relative artifact path for a fully-qualified name.
    fn artifact_path(name: &str) -> PathBuf {
        let mut path: PathBuf = name.split('.').collect();
        path.set_extension("class");
        path
    }

    /// Load a type from the first search location that has it.
    fn load(&self, name: &str) -> Result<CompiledType, TransformError> {
        let relative = Self::artifact_path(name);
        for search_path in &self.search_paths {
            let candidate = search_path.join(&relative);
            if !candidate.is_file() {
                continue;
            }
            let bytes = fs::read(&candidate).map_err(|e| {
                TransformError::type_resolution(name, format!("cannot read artifact: {e}"))
            })?;
            let class: CompiledType = serde_json::from_slice(&bytes).map_err(|e| {
                TransformError::type_resolution(name, format!("undecodable artifact: {e}"))
            })?;
            if class.name() != name {
                return Err(TransformError::type_resolution(
                    name,
                    format!("artifact declares mismatched name '{}'", class.name()),
                ));
            }
            debug!(class = name, path = %candidate.display(), "loaded type");
            return Ok(class);
        }
        Err(TransformError::type_resolution(
            name,
            "not found on any search path",
        ))
    }

    /// Resolve without handing out a mutable borrow.
    fn ensure_cached(&mut self, name: &str) -> Result<(), TransformError> {
        if self.types.contains_key(name) {
            return Ok(());
        }
        let class = self.load(name)?;
        self.types.insert(name.to_string(), class);
        Ok(())
    }
}

impl TypePool for MemoryPool {
    fn resolve(&mut self, name: &str) -> Result<&mut CompiledType, TransformError> {
        self.ensure_cached(name)?;
        Ok(self
            .types
            .get_mut(name)
            .expect("type cached by ensure_cached"))
    }

    fn verify_hierarchy(&mut self, name: &str) -> Result<(), TransformError> {
        let mut seen = HashSet::new();
        let mut current = name.to_string();
        loop {
            if current == ROOT_TYPE {
                return Ok(());
            }
            if !seen.insert(current.clone()) {
                return Err(TransformError::type_resolution(
                    name,
                    format!("supertype chain cycles through '{current}'"),
                ));
            }
            self.ensure_cached(&current)?;
            let class = self
                .types
                .get(&current)
                .expect("type cached by ensure_cached");
            match class.superclass() {
                // No recorded superclass terminates the chain at the root.
                None => return Ok(()),
                Some(superclass) => current = superclass.to_string(),
            }
        }
    }

    fn commit(&mut self, name: &str, root: &Path) -> Result<(), TransformError> {
        let class = self
            .types
            .get_mut(name)
            .ok_or_else(|| TransformError::type_resolution(name, "never resolved by this pool"))?;

        let target = root.join(Self::artifact_path(name));
        let bytes = serde_json::to_vec_pretty(&*class)
            .map_err(|e| TransformError::persistence(name, &target, io::Error::other(e)))?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| TransformError::persistence(name, &target, e))?;
        }
        fs::write(&target, bytes).map_err(|e| TransformError::persistence(name, &target, e))?;
        class.freeze();
        debug!(class = name, path = %target.display(), "committed type");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{AccessFlags, ACC_PRIVATE};
    use crate::model::Field;

    fn widget() -> CompiledType {
        CompiledType::new("com.example.Widget")
            .with_superclass(ROOT_TYPE)
            .with_field(Field::new("count", "I", AccessFlags::new(ACC_PRIVATE)))
    }

    fn seed_dir(dir: &Path, classes: &[CompiledType]) {
        let mut pool = MemoryPool::new();
        for class in classes {
            pool.insert(class.clone());
            pool.commit(class.name(), dir).unwrap();
        }
    }

    #[test]
    fn resolve_returns_the_same_representation_on_repeated_lookup() {
        let mut pool = MemoryPool::new();
        pool.insert(widget());

        pool.resolve("com.example.Widget")
            .unwrap()
            .publicize_field(0)
            .unwrap();
        // A second lookup observes the earlier mutation.
        let again = pool.resolve("com.example.Widget").unwrap();
        assert!(again.is_modified());
        assert!(again.fields()[0].flags().is_public());
    }

    #[test]
    fn resolve_unknown_name_is_a_type_resolution_error() {
        let mut pool = MemoryPool::new();
        let err = pool.resolve("com.example.Missing").unwrap_err();
        assert!(matches!(err, TransformError::TypeResolution { .. }));
    }

    #[test]
    fn resolve_loads_lazily_from_search_paths_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        seed_dir(second.path(), &[widget()]);

        let mut pool = MemoryPool::with_search_paths([first.path(), second.path()]);
        let class = pool.resolve("com.example.Widget").unwrap();
        assert_eq!(class.name(), "com.example.Widget");
        assert!(!class.is_frozen());
    }

    #[test]
    fn artifact_name_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let impostor = CompiledType::new("com.example.Other").with_superclass(ROOT_TYPE);
        let path = dir.path().join("com/example/Widget.class");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_json::to_vec(&impostor).unwrap()).unwrap();

        let mut pool = MemoryPool::with_search_paths([dir.path()]);
        let err = pool.resolve("com.example.Widget").unwrap_err();
        assert!(matches!(err, TransformError::TypeResolution { .. }));
    }

    #[test]
    fn undecodable_artifact_is_a_type_resolution_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("com/example/Widget.class");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"\xca\xfe\xba\xbe").unwrap();

        let mut pool = MemoryPool::with_search_paths([dir.path()]);
        let err = pool.resolve("com.example.Widget").unwrap_err();
        assert!(matches!(err, TransformError::TypeResolution { .. }));
    }

    #[test]
    fn verify_hierarchy_walks_to_the_root() {
        let mut pool = MemoryPool::new();
        pool.insert(
            CompiledType::new("com.example.Base").with_superclass(ROOT_TYPE),
        );
        pool.insert(
            CompiledType::new("com.example.Derived").with_superclass("com.example.Base"),
        );
        pool.verify_hierarchy("com.example.Derived").unwrap();
    }

    #[test]
    fn verify_hierarchy_fails_on_missing_supertype() {
        let mut pool = MemoryPool::new();
        pool.insert(
            CompiledType::new("com.example.Orphan").with_superclass("com.example.Gone"),
        );
        let err = pool.verify_hierarchy("com.example.Orphan").unwrap_err();
        assert!(matches!(err, TransformError::TypeResolution { .. }));
    }

    #[test]
    fn verify_hierarchy_fails_on_cycle() {
        let mut pool = MemoryPool::new();
        pool.insert(CompiledType::new("com.example.A").with_superclass("com.example.B"));
        pool.insert(CompiledType::new("com.example.B").with_superclass("com.example.A"));
        let err = pool.verify_hierarchy("com.example.A").unwrap_err();
        assert!(matches!(err, TransformError::TypeResolution { .. }));
    }

    #[test]
    fn commit_writes_under_root_and_freezes() {
        let dir = tempfile::tempdir().unwrap();
        let mut pool = MemoryPool::new();
        pool.insert(widget());
        pool.commit("com.example.Widget", dir.path()).unwrap();

        assert!(dir.path().join("com/example/Widget.class").is_file());
        assert!(pool.resolve("com.example.Widget").unwrap().is_frozen());
    }

    #[test]
    fn commit_round_trips_through_a_fresh_pool() {
        let dir = tempfile::tempdir().unwrap();
        seed_dir(dir.path(), &[widget()]);

        let mut pool = MemoryPool::with_search_paths([dir.path()]);
        let class = pool.resolve("com.example.Widget").unwrap();
        assert_eq!(class.fields().len(), 1);
        assert_eq!(class.superclass(), Some(ROOT_TYPE));
    }

    #[test]
    fn commit_of_unresolved_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut pool = MemoryPool::new();
        let err = pool.commit("com.example.Missing", dir.path()).unwrap_err();
        assert!(matches!(err, TransformError::TypeResolution { .. }));
    }

    #[test]
    fn nested_type_artifact_path_keeps_the_marker() {
        assert_eq!(
            MemoryPool::artifact_path("com.example.Foo$Bar"),
            PathBuf::from("com/example/Foo$Bar.class")
        );
    }
}
