//! Explicit-presence fields for partial updates
//!
//! A [`Patch`] distinguishes a field that was omitted from the payload
//! (`None`) from one explicitly set to null (`Some(None)`) and from one
//! carrying a value (`Some(Some(v))`). Pair it with
//! `#[serde(default, deserialize_with = "double_option")]`.

use serde::{Deserialize, Deserializer};

/// Three-state update field
pub type Patch<T> = Option<Option<T>>;

/// Deserialize a present field (null or value) as `Some(..)`.
///
/// Omitted fields never reach the deserializer and fall back to `None`
/// through `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Whether the field appeared in the payload, null included
pub fn is_present<T>(patch: &Patch<T>) -> bool {
    patch.is_some()
}

/// Apply a patch to a nullable target: null clears, a value replaces
pub fn apply_nullable<T>(target: &mut Option<T>, patch: Patch<T>) {
    if let Some(value) = patch {
        *target = value;
    }
}

/// Apply a patch to a non-nullable target.
///
/// Explicit nulls are rejected during validation and leave the target untouched here.
pub fn apply_required<T>(target: &mut T, patch: Patch<T>) {
    if let Some(Some(value)) = patch {
        *target = value;
    }
}
