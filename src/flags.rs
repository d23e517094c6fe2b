//! Access-flag word manipulation for compiled-type members.
//!
//! The class-file format stores member modifiers as a single `u16` bit word.
//! This module provides:
//! - Named constants for the bits the engine needs to know about
//! - [`AccessFlags`], a newtype that performs targeted surgery on the
//!   three-bit visibility sub-field while preserving every other bit verbatim
//! - [`Visibility`], the four-way classification of that sub-field
//!
//! The engine never replaces a modifier word wholesale: elevation rewrites
//! only the visibility bits, so `static`, `final`, `synthetic` and friends
//! survive untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Modifier Bit Constants
// ============================================================================

/// `public` visibility bit.
pub const ACC_PUBLIC: u16 = 0x0001;
/// `private` visibility bit.
pub const ACC_PRIVATE: u16 = 0x0002;
/// `protected` visibility bit.
pub const ACC_PROTECTED: u16 = 0x0004;
/// `static` modifier bit (opaque to the engine, preserved unchanged).
pub const ACC_STATIC: u16 = 0x0008;
/// `final` modifier bit (opaque to the engine, preserved unchanged).
pub const ACC_FINAL: u16 = 0x0010;
/// `volatile` field bit (opaque to the engine, preserved unchanged).
pub const ACC_VOLATILE: u16 = 0x0040;
/// `transient` field bit (opaque to the engine, preserved unchanged).
pub const ACC_TRANSIENT: u16 = 0x0080;
/// Compiler-generated member bit (opaque to the engine, preserved unchanged).
pub const ACC_SYNTHETIC: u16 = 0x1000;

/// The three-bit visibility sub-field of the modifier word.
const VISIBILITY_MASK: u16 = ACC_PUBLIC | ACC_PRIVATE | ACC_PROTECTED;

// ============================================================================
// Visibility
// ============================================================================

/// Access-control classification of a member.
///
/// Package-private is the absence of all three visibility bits; the class-file
/// format has no dedicated bit for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// `private`: accessible only within the declaring type.
    Private,
    /// No visibility bit set: accessible within the declaring package.
    PackagePrivate,
    /// `protected`: accessible to subtypes and the declaring package.
    Protected,
    /// `public`: accessible everywhere.
    Public,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Private => write!(f, "private"),
            Visibility::PackagePrivate => write!(f, "package-private"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Public => write!(f, "public"),
        }
    }
}

// ============================================================================
// AccessFlags
// ============================================================================

/// The raw modifier word of a member, with targeted visibility operations.
///
/// All bits outside the visibility sub-field are opaque to this type: they are
/// carried, compared, and serialized, but never interpreted or altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessFlags(u16);

impl AccessFlags {
    /// Wrap a raw modifier word.
    pub fn new(bits: u16) -> Self {
        AccessFlags(bits)
    }

    /// The raw modifier word.
    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Classify the visibility sub-field.
    ///
    /// A word with more than one visibility bit set is illegal in the binary
    /// format; such words classify by the lowest set bit.
    pub fn visibility(&self) -> Visibility {
        let vis = self.0 & VISIBILITY_MASK;
        if vis & ACC_PUBLIC != 0 {
            Visibility::Public
        } else if vis & ACC_PRIVATE != 0 {
            Visibility::Private
        } else if vis & ACC_PROTECTED != 0 {
            Visibility::Protected
        } else {
            Visibility::PackagePrivate
        }
    }

    /// Whether the `public` bit is set.
    pub fn is_public(&self) -> bool {
        self.0 & ACC_PUBLIC != 0
    }

    /// Overwrite the visibility sub-field with `public`, leaving every other
    /// bit untouched. Returns `true` if the word actually changed.
    pub(crate) fn set_public(&mut self) -> bool {
        let next = (self.0 & !VISIBILITY_MASK) | ACC_PUBLIC;
        if next == self.0 {
            return false;
        }
        self.0 = next;
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
