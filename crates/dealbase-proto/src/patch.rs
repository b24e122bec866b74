//! Tri-state field presence for sparse updates.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// The state of a single field in a sparse update.
///
/// A field is either left alone (`Keep`) or replaced (`Set`). Nullable
/// columns use `Patch<Option<T>>`, so an explicit null arrives as
/// `Set(None)` — distinct from `Keep`, which means the field was absent
/// from the update entirely. Collapsing those two states loses the caller's
/// intent, so both serializers preserve the distinction:
///
/// - on the binary wire the enum is archived as-is;
/// - on the JSON boundary an absent key deserializes to `Keep` (via
///   `#[serde(default)]` on the containing struct field), `null` to
///   `Set(None)`, and a value to `Set(Some(..))`. `Keep` fields must be
///   skipped when serializing (`skip_serializing_if = "Patch::is_keep"`).
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub enum Patch<T> {
    /// Leave the current value unchanged.
    Keep,
    /// Replace the current value.
    Set(T),
}

impl<T> Patch<T> {
    /// Whether this field is left unchanged.
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Whether this field carries a replacement value.
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// The replacement value, if any.
    pub fn get(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Keep => None,
        }
    }

    /// Consume the patch, yielding the replacement value if any.
    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Keep => None,
        }
    }
}

impl<T: Clone> Patch<T> {
    /// Write the replacement value into `slot`, if one is present.
    pub fn apply_to(&self, slot: &mut T) {
        if let Patch::Set(value) = self {
            *slot = value.clone();
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Set(value)
    }
}

impl<T: SerdeSerialize> SerdeSerialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Keep => Err(serde::ser::Error::custom(
                "Patch::Keep must be skipped with skip_serializing_if",
            )),
        }
    }
}

impl<'de, T: SerdeDeserialize<'de>> SerdeDeserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}
