//! Tri-state field wrapper.
//!
//! Neutron distinguishes a field that is missing from a payload from one that
//! is present as `null`. [`Nullable`] keeps those apart so partial updates
//! only touch what the caller set.
//!
//! Use it with `#[serde(default, skip_serializing_if = "Nullable::is_absent")]`
//! so absent fields are left out of the JSON and missing keys decode to
//! [`Nullable::Absent`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value that may be absent, explicitly null, or set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nullable<T> {
    /// Field not present.
    Absent,
    /// Field present with an explicit `null`.
    Null,
    /// Field present with a value.
    Value(T),
}

impl<T> Nullable<T> {
    /// True if the field is not present.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// True if the field is present as `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True if the field carries a value.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Borrow the value, if set.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Convert `&Nullable<T>` into `Nullable<&T>`.
    #[must_use]
    pub const fn as_ref(&self) -> Nullable<&T> {
        match self {
            Self::Absent => Nullable::Absent,
            Self::Null => Nullable::Null,
            Self::Value(value) => Nullable::Value(value),
        }
    }

    /// Build from an `Option`; `None` becomes an explicit null, not absence.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }

    /// Map the contained value, preserving absent and null.
    pub fn map<U, F>(self, f: F) -> Nullable<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Absent => Nullable::Absent,
            Self::Null => Nullable::Null,
            Self::Value(value) => Nullable::Value(f(value)),
        }
    }

    /// Collapse into an `Option`, losing the absent/null distinction.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

impl<T: std::ops::Deref> Nullable<T> {
    /// Borrow the dereferenced value, if set.
    #[must_use]
    pub fn as_deref(&self) -> Option<&T::Target> {
        self.value().map(|value| &**value)
    }
}

impl<T: Copy> Nullable<T> {
    /// Copy the value out, if set.
    #[must_use]
    pub const fn copied(&self) -> Option<T> {
        match self {
            Self::Value(value) => Some(*value),
            Self::Absent | Self::Null => None,
        }
    }
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Nullable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "<absent>"),
            Self::Null => write!(f, "null"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Absent fields are normally skipped; if not, null is the closest encoding.
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Value(value) => serializer.serialize_some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the key is present; missing keys go through `Default`.
        Option::<T>::deserialize(deserializer).map(Self::from_option)
    }
}
