//! In-memory mutable model of a compiled type.
//!
//! A [`CompiledType`] is obtained from a type pool, mutated in place by
//! transformation strategies, and either discarded (nothing changed) or
//! serialized back to storage by the driver. The model tracks two pieces of
//! runtime state that never round-trip through storage:
//!
//! - `modified`: true if and only if at least one member's visibility word
//!   actually changed since the type was obtained from the pool
//! - `frozen`: true once the representation has been committed; a frozen
//!   type rejects mutation until [`CompiledType::ensure_mutable`] unlocks it
//!
//! Member flag words are private and only mutable through the owning type's
//! `publicize_*` methods, which is what keeps the modified flag in lockstep
//! with actual visibility changes. Everything else about a member (name,
//! descriptor, annotations, parameter types) is plain readable data.
//!
//! The engine never adds or removes members; the declaration sets loaded by
//! the pool are the declaration sets written back.

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::flags::AccessFlags;

// ============================================================================
// Annotation
// ============================================================================

/// Structured annotation descriptor: a qualified type name plus the raw
/// argument blob as it appears in the artifact.
///
/// The engine reads only the type name (for prefix matching); the argument
/// blob is carried opaquely so write-back preserves it byte for byte. A pool
/// loader that cannot decode a descriptor's name records an empty name;
/// consulting such a descriptor is an error, never a silent skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    arguments: Vec<u8>,
}

impl Annotation {
    /// Create a descriptor with no arguments.
    pub fn new(type_name: impl Into<String>) -> Self {
        Annotation {
            type_name: type_name.into(),
            arguments: Vec::new(),
        }
    }

    /// Create a descriptor with a raw argument blob.
    pub fn with_arguments(type_name: impl Into<String>, arguments: Vec<u8>) -> Self {
        Annotation {
            type_name: type_name.into(),
            arguments,
        }
    }

    /// Fully-qualified type name of the annotation. Empty if the loader could
    /// not resolve the descriptor.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Raw argument blob, uninterpreted.
    pub fn arguments(&self) -> &[u8] {
        &self.arguments
    }
}

// ============================================================================
// Members
// ============================================================================

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Type descriptor string, opaque to the engine.
    pub descriptor: String,
    flags: AccessFlags,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl Field {
    /// Create a field with no annotations.
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, flags: AccessFlags) -> Self {
        Field {
            name: name.into(),
            descriptor: descriptor.into(),
            flags,
            annotations: Vec::new(),
        }
    }

    /// Attach an annotation (builder style, for pool loaders and tests).
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Current modifier word.
    pub fn flags(&self) -> AccessFlags {
        self.flags
    }
}

/// A declared method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Signature descriptor string, opaque to the engine.
    pub descriptor: String,
    flags: AccessFlags,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl Method {
    /// Create a method with no annotations.
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, flags: AccessFlags) -> Self {
        Method {
            name: name.into(),
            descriptor: descriptor.into(),
            flags,
            annotations: Vec::new(),
        }
    }

    /// Attach an annotation (builder style, for pool loaders and tests).
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Current modifier word.
    pub fn flags(&self) -> AccessFlags {
        self.flags
    }
}

/// A declared constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    /// Parameter type names in declaration order. An empty list denotes the
    /// no-argument constructor. An empty *entry* denotes a parameter
    /// descriptor the loader could not decode.
    pub parameter_types: Vec<String>,
    flags: AccessFlags,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl Constructor {
    /// Create a constructor.
    pub fn new(parameter_types: Vec<String>, flags: AccessFlags) -> Self {
        Constructor {
            parameter_types,
            flags,
            annotations: Vec::new(),
        }
    }

    /// The no-argument constructor.
    pub fn no_args(flags: AccessFlags) -> Self {
        Constructor::new(Vec::new(), flags)
    }

    /// Whether this is the no-argument constructor.
    pub fn is_zero_arg(&self) -> bool {
        self.parameter_types.is_empty()
    }

    /// Current modifier word.
    pub fn flags(&self) -> AccessFlags {
        self.flags
    }
}

// ============================================================================
// CompiledType
// ============================================================================

/// In-memory mutable representation of one compiled type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledType {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    superclass: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    methods: Vec<Method>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    constructors: Vec<Constructor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    nested_types: Vec<String>,
    #[serde(skip)]
    modified: bool,
    #[serde(skip)]
    frozen: bool,
}

impl CompiledType {
    /// Create an empty type with the given fully-qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        CompiledType {
            name: name.into(),
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            nested_types: Vec::new(),
            modified: false,
            frozen: false,
        }
    }

    /// Set the superclass name (builder style).
    pub fn with_superclass(mut self, name: impl Into<String>) -> Self {
        self.superclass = Some(name.into());
        self
    }

    /// Append a declared field (builder style).
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a declared method (builder style).
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Append a declared constructor (builder style).
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Record a nested-type name (builder style).
    pub fn with_nested_type(mut self, name: impl Into<String>) -> Self {
        self.nested_types.push(name.into());
        self
    }

    /// Fully-qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Superclass name, if recorded. `None` denotes the hierarchy root.
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Declared methods in declaration order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Declared constructors in declaration order.
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Names of nested types declared within this type.
    pub fn nested_types(&self) -> &[String] {
        &self.nested_types
    }

    /// Whether any member's visibility changed since this representation was
    /// obtained from the pool.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Whether the representation has been committed and is locked against
    /// mutation.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Lock the representation. Pools call this after commit.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Unlock a frozen representation. Idempotent and cheap; strategies call
    /// this before every mutation because pools may re-freeze at any commit.
    pub fn ensure_mutable(&mut self) {
        self.frozen = false;
    }

    /// Elevate the field at `index` to public visibility.
    ///
    /// Returns `true` if the modifier word changed. Only the visibility
    /// sub-field is rewritten; all other modifier bits are preserved.
    pub fn publicize_field(&mut self, index: usize) -> Result<bool, TransformError> {
        self.check_mutable()?;
        let field = self
            .fields
            .get_mut(index)
            .ok_or_else(|| field_out_of_range(&self.name, index))?;
        let changed = field.flags.set_public();
        self.modified |= changed;
        Ok(changed)
    }

    /// Elevate the method at `index` to public visibility.
    ///
    /// Returns `true` if the modifier word changed.
    pub fn publicize_method(&mut self, index: usize) -> Result<bool, TransformError> {
        self.check_mutable()?;
        let method = self
            .methods
            .get_mut(index)
            .ok_or_else(|| method_out_of_range(&self.name, index))?;
        let changed = method.flags.set_public();
        self.modified |= changed;
        Ok(changed)
    }

    /// Elevate the constructor at `index` to public visibility.
    ///
    /// Returns `true` if the modifier word changed.
    pub fn publicize_constructor(&mut self, index: usize) -> Result<bool, TransformError> {
        self.check_mutable()?;
        let constructor = self
            .constructors
            .get_mut(index)
            .ok_or_else(|| constructor_out_of_range(&self.name, index))?;
        let changed = constructor.flags.set_public();
        self.modified |= changed;
        Ok(changed)
    }

    fn check_mutable(&self) -> Result<(), TransformError> {
        if self.frozen {
            return Err(TransformError::malformed(
                self.name.as_str(),
                "mutation attempted on a frozen representation",
            ));
        }
        Ok(())
    }
}

fn field_out_of_range(type_name: &str, index: usize) -> TransformError {
    TransformError::malformed(type_name, format!("field index {index} out of range"))
}

fn method_out_of_range(type_name: &str, index: usize) -> TransformError {
    TransformError::malformed(type_name, format!("method index {index} out of range"))
}

fn constructor_out_of_range(type_name: &str, index: usize) -> TransformError {
    TransformError::malformed(type_name, format!("constructor index {index} out of range"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{ACC_FINAL, ACC_PRIVATE, ACC_PUBLIC, ACC_STATIC};
    use crate::flags::Visibility;

    fn sample_type() -> CompiledType {
        CompiledType::new("com.example.Widget")
            .with_superclass("java.lang.Object")
            .with_field(Field::new(
                "count",
                "I",
                AccessFlags::new(ACC_PRIVATE | ACC_STATIC),
            ))
            .with_method(Method::new("render", "()V", AccessFlags::new(0)))
            .with_constructor(Constructor::no_args(AccessFlags::new(ACC_PRIVATE)))
    }

    #[test]
    fn fresh_type_is_unmodified_and_unfrozen() {
        let ty = sample_type();
        assert!(!ty.is_modified());
        assert!(!ty.is_frozen());
    }

    #[test]
    fn publicize_field_sets_modified_and_preserves_bits() {
        let mut ty = sample_type();
        assert!(ty.publicize_field(0).unwrap());
        assert!(ty.is_modified());
        assert_eq!(ty.fields()[0].flags().bits(), ACC_PUBLIC | ACC_STATIC);
    }

    #[test]
    fn publicize_already_public_member_leaves_type_unmodified() {
        let mut ty = CompiledType::new("com.example.Open").with_method(Method::new(
            "run",
            "()V",
            AccessFlags::new(ACC_PUBLIC | ACC_FINAL),
        ));
        assert!(!ty.publicize_method(0).unwrap());
        assert!(!ty.is_modified());
        assert_eq!(ty.methods()[0].flags().bits(), ACC_PUBLIC | ACC_FINAL);
    }

    #[test]
    fn publicize_out_of_range_is_malformed() {
        let mut ty = sample_type();
        let err = ty.publicize_field(7).unwrap_err();
        assert!(matches!(err, TransformError::MalformedType { .. }));
        assert!(!ty.is_modified());
    }

    #[test]
    fn frozen_type_rejects_mutation_until_unlocked() {
        let mut ty = sample_type();
        ty.freeze();
        let err = ty.publicize_constructor(0).unwrap_err();
        assert!(matches!(err, TransformError::MalformedType { .. }));

        ty.ensure_mutable();
        assert!(ty.publicize_constructor(0).unwrap());
        assert_eq!(
            ty.constructors()[0].flags().visibility(),
            Visibility::Public
        );
    }

    #[test]
    fn ensure_mutable_is_idempotent() {
        let mut ty = sample_type();
        ty.ensure_mutable();
        ty.ensure_mutable();
        assert!(!ty.is_frozen());
    }

    #[test]
    fn zero_arg_constructor_detection() {
        assert!(Constructor::no_args(AccessFlags::new(0)).is_zero_arg());
        assert!(
            !Constructor::new(vec!["java.lang.String".to_string()], AccessFlags::new(0))
                .is_zero_arg()
        );
    }

    #[test]
    fn runtime_state_does_not_round_trip_through_storage() {
        let mut ty = sample_type();
        ty.publicize_field(0).unwrap();
        ty.freeze();

        let json = serde_json::to_string(&ty).unwrap();
        let back: CompiledType = serde_json::from_str(&json).unwrap();
        assert!(!back.is_modified());
        assert!(!back.is_frozen());
        assert_eq!(back.fields()[0].flags().bits(), ACC_PUBLIC | ACC_STATIC);
        assert_eq!(back.name(), "com.example.Widget");
    }

    #[test]
    fn annotation_carries_opaque_arguments() {
        let ann = Annotation::with_arguments("jakarta.inject.Named", vec![0x01, 0x02]);
        assert_eq!(ann.type_name(), "jakarta.inject.Named");
        assert_eq!(ann.arguments(), &[0x01, 0x02]);
    }
}
