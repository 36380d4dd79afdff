//! Typed, named variables owned by a state machine.
//!
//! Fields are the only input transition conditions can observe. They are
//! registered once while the machine is assembled and mutated afterwards
//! through the typed setters.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The type of value a field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Int,
    Float,
    Bool,
}

/// A field value tagged with its kind.
///
/// In human-readable formats non-finite floats are written as the strings
/// `"NaN"`, `"inf"` and `"-inf"`, since JSON numbers cannot hold them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Int(i32),
    Float(#[serde(with = "float_repr")] f32),
    Bool(bool),
}

mod float_repr {
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() || !serializer.is_human_readable() {
            return serializer.serialize_f32(*value);
        }
        let name = if value.is_nan() {
            "NaN"
        } else if value.is_sign_positive() {
            "inf"
        } else {
            "-inf"
        };
        serializer.serialize_str(name)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(FloatVisitor)
        } else {
            deserializer.deserialize_f32(FloatVisitor)
        }
    }

    struct FloatVisitor;

    impl<'de> Visitor<'de> for FloatVisitor {
        type Value = f32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or one of \"NaN\", \"inf\", \"-inf\"")
        }

        fn visit_f32<E: de::Error>(self, value: f32) -> Result<f32, E> {
            Ok(value)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f32, E> {
            Ok(value as f32)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f32, E> {
            Ok(value as f32)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f32, E> {
            Ok(value as f32)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f32, E> {
            match value {
                "NaN" => Ok(f32::NAN),
                "inf" => Ok(f32::INFINITY),
                "-inf" => Ok(f32::NEG_INFINITY),
                other => Err(E::invalid_value(Unexpected::Str(other), &self)),
            }
        }
    }
}

impl FieldValue {
    /// Kind of the stored value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Int(_) => FieldKind::Int,
            Self::Float(_) => FieldKind::Float,
            Self::Bool(_) => FieldKind::Bool,
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Name-keyed store of typed fields.
///
/// # Example
///
/// ```rust
/// use commandable_fsm::core::{FieldKind, FieldRegistry, FieldValue};
///
/// let mut fields = FieldRegistry::new();
/// fields.register_float_field("movementSpeed", 0.0).unwrap();
/// fields.set_float_field("movementSpeed", 5.0).unwrap();
///
/// assert_eq!(
///     fields.get_field("movementSpeed").unwrap(),
///     (FieldKind::Float, FieldValue::Float(5.0))
/// );
/// assert!(fields.set_int_field("movementSpeed", 1).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldRegistry {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding one field.
    pub fn with_field(name: &str, default: FieldValue) -> Self {
        Self {
            fields: BTreeMap::from([(name.to_string(), default)]),
        }
    }

    pub fn register_int_field(&mut self, name: &str, default: i32) -> Result<(), ConfigError> {
        self.register(name, FieldValue::Int(default))
    }

    pub fn register_float_field(&mut self, name: &str, default: f32) -> Result<(), ConfigError> {
        self.register(name, FieldValue::Float(default))
    }

    pub fn register_bool_field(&mut self, name: &str, default: bool) -> Result<(), ConfigError> {
        self.register(name, FieldValue::Bool(default))
    }

    /// Register a field with an already-tagged default value.
    pub fn register(&mut self, name: &str, default: FieldValue) -> Result<(), ConfigError> {
        if self.fields.contains_key(name) {
            return Err(ConfigError::DuplicateField {
                name: name.to_string(),
            });
        }
        self.fields.insert(name.to_string(), default);
        Ok(())
    }

    pub fn set_int_field(&mut self, name: &str, value: i32) -> Result<(), ConfigError> {
        self.set(name, FieldValue::Int(value))
    }

    pub fn set_float_field(&mut self, name: &str, value: f32) -> Result<(), ConfigError> {
        self.set(name, FieldValue::Float(value))
    }

    pub fn set_bool_field(&mut self, name: &str, value: bool) -> Result<(), ConfigError> {
        self.set(name, FieldValue::Bool(value))
    }

    /// Overwrite a registered field. The new value must match the registered kind.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), ConfigError> {
        let slot = self
            .fields
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownField {
                name: name.to_string(),
            })?;
        if slot.kind() != value.kind() {
            return Err(ConfigError::FieldKindMismatch {
                name: name.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    /// Look up a field's kind and current value.
    pub fn get_field(&self, name: &str) -> Result<(FieldKind, FieldValue), ConfigError> {
        self.fields
            .get(name)
            .map(|value| (value.kind(), *value))
            .ok_or_else(|| ConfigError::UnknownField {
                name: name.to_string(),
            })
    }

    pub fn int_field(&self, name: &str) -> Result<i32, ConfigError> {
        match self.get_field(name)? {
            (_, FieldValue::Int(value)) => Ok(value),
            (found, _) => Err(Self::mismatch(name, FieldKind::Int, found)),
        }
    }

    pub fn float_field(&self, name: &str) -> Result<f32, ConfigError> {
        match self.get_field(name)? {
            (_, FieldValue::Float(value)) => Ok(value),
            (found, _) => Err(Self::mismatch(name, FieldKind::Float, found)),
        }
    }

    pub fn bool_field(&self, name: &str) -> Result<bool, ConfigError> {
        match self.get_field(name)? {
            (_, FieldValue::Bool(value)) => Ok(value),
            (found, _) => Err(Self::mismatch(name, FieldKind::Bool, found)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), *value))
    }

    fn mismatch(name: &str, expected: FieldKind, found: FieldKind) -> ConfigError {
        ConfigError::FieldKindMismatch {
            name: name.to_string(),
            expected,
            found,
        }
    }
}
