//! Explicit optional wrapper for sparse (PATCH-style) updates
//!
//! A `Patch<T>` is either `Absent` (leave the stored value alone) or
//! `Present(T)` (replace it). There is no "clear" state: a sparse update can
//! never null out a stored value. Blank strings are treated as absent once
//! passed through [`Patch::non_blank`].

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Patch<T> {
    Absent,
    Present(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Patch::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Present(value) => Patch::Present(value),
            Patch::Absent => Patch::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Present(value) => Some(value),
            Patch::Absent => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Present(value) => Patch::Present(f(value)),
            Patch::Absent => Patch::Absent,
        }
    }

    /// Overwrite `target` when present. Returns whether a write happened.
    pub fn apply_to(self, target: &mut T) -> bool {
        match self {
            Patch::Present(value) => {
                *target = value;
                true
            }
            Patch::Absent => false,
        }
    }

    /// Overwrite an optional `target` when present.
    pub fn apply_to_option(self, target: &mut Option<T>) -> bool {
        match self {
            Patch::Present(value) => {
                *target = Some(value);
                true
            }
            Patch::Absent => false,
        }
    }
}

impl Patch<String> {
    /// Collapse blank and whitespace-only strings to `Absent`
    pub fn non_blank(self) -> Self {
        match self {
            Patch::Present(value) if value.trim().is_empty() => Patch::Absent,
            other => other,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Present(value),
            None => Patch::Absent,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` and a missing field (via #[serde(default)]) both mean absent
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}
