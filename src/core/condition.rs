//! Predicates over a single named field.
//!
//! A condition compares one field against a literal. Kind and operator
//! compatibility is checked when the condition is built, field existence is
//! checked when the owning transition is added to a machine, so evaluation
//! during a tick only fails on a misconfigured registry.

use super::error::ConfigError;
use super::field::{FieldKind, FieldRegistry, FieldValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison applied between a field and a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Operator {
    /// Ordering operators are meaningless on booleans.
    pub fn supports(&self, kind: FieldKind) -> bool {
        match kind {
            FieldKind::Bool => matches!(self, Self::Equal | Self::NotEqual),
            FieldKind::Int | FieldKind::Float => true,
        }
    }

    fn holds(&self, ordering: Option<Ordering>) -> bool {
        // NaN compares as unordered: only NotEqual holds
        let Some(ordering) = ordering else {
            return matches!(self, Self::NotEqual);
        };
        match self {
            Self::Equal => ordering == Ordering::Equal,
            Self::NotEqual => ordering != Ordering::Equal,
            Self::Greater => ordering == Ordering::Greater,
            Self::GreaterOrEqual => ordering != Ordering::Less,
            Self::Less => ordering == Ordering::Less,
            Self::LessOrEqual => ordering != Ordering::Greater,
        }
    }
}

/// Immutable guard over one field.
///
/// # Example
///
/// ```rust
/// use commandable_fsm::core::{FieldRegistry, Operator, TransitionCondition};
///
/// let mut fields = FieldRegistry::new();
/// fields.register_float_field("movementSpeed", 0.0).unwrap();
///
/// let moving = TransitionCondition::float("movementSpeed", Operator::Greater, 0.0);
/// assert!(!moving.evaluate(&fields).unwrap());
///
/// fields.set_float_field("movementSpeed", 5.0).unwrap();
/// assert!(moving.evaluate(&fields).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionCondition {
    kind: FieldKind,
    operator: Operator,
    field: String,
    literal: FieldValue,
}

impl TransitionCondition {
    /// Build a condition, rejecting operator/kind and literal/kind mismatches.
    pub fn new(
        kind: FieldKind,
        operator: Operator,
        field: impl Into<String>,
        literal: FieldValue,
    ) -> Result<Self, ConfigError> {
        let field = field.into();
        if !operator.supports(kind) {
            return Err(ConfigError::InvalidOperator { operator, kind });
        }
        if literal.kind() != kind {
            return Err(ConfigError::LiteralKindMismatch {
                field,
                declared: kind,
                literal: literal.kind(),
            });
        }
        Ok(Self {
            kind,
            operator,
            field,
            literal,
        })
    }

    pub fn int(field: impl Into<String>, operator: Operator, literal: i32) -> Self {
        Self {
            kind: FieldKind::Int,
            operator,
            field: field.into(),
            literal: FieldValue::Int(literal),
        }
    }

    pub fn float(field: impl Into<String>, operator: Operator, literal: f32) -> Self {
        Self {
            kind: FieldKind::Float,
            operator,
            field: field.into(),
            literal: FieldValue::Float(literal),
        }
    }

    /// Boolean conditions only accept `Equal` and `NotEqual`.
    pub fn bool(
        field: impl Into<String>,
        operator: Operator,
        literal: bool,
    ) -> Result<Self, ConfigError> {
        Self::new(FieldKind::Bool, operator, field, FieldValue::Bool(literal))
    }

    /// Infallible `bool == literal` condition.
    pub fn bool_eq(field: impl Into<String>, literal: bool) -> Self {
        Self {
            kind: FieldKind::Bool,
            operator: Operator::Equal,
            field: field.into(),
            literal: FieldValue::Bool(literal),
        }
    }

    pub fn bool_ne(field: impl Into<String>, literal: bool) -> Self {
        Self {
            kind: FieldKind::Bool,
            operator: Operator::NotEqual,
            field: field.into(),
            literal: FieldValue::Bool(literal),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn literal(&self) -> FieldValue {
        self.literal
    }

    /// Check that the condition is well-formed against a registry.
    ///
    /// Deserialized conditions bypass `new`, so operator and literal kinds are
    /// re-checked here along with field existence and kind.
    pub fn validate(&self, fields: &FieldRegistry) -> Result<(), ConfigError> {
        if !self.operator.supports(self.kind) {
            return Err(ConfigError::InvalidOperator {
                operator: self.operator,
                kind: self.kind,
            });
        }
        if self.literal.kind() != self.kind {
            return Err(ConfigError::LiteralKindMismatch {
                field: self.field.clone(),
                declared: self.kind,
                literal: self.literal.kind(),
            });
        }
        let (found, _) = fields.get_field(&self.field)?;
        if found != self.kind {
            return Err(ConfigError::FieldKindMismatch {
                name: self.field.clone(),
                expected: self.kind,
                found,
            });
        }
        Ok(())
    }

    /// Compare the field's current value against the literal.
    pub fn evaluate(&self, fields: &FieldRegistry) -> Result<bool, ConfigError> {
        let (found, value) = fields.get_field(&self.field)?;
        let ordering = match (value, self.literal) {
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(&b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(&b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) if self.operator.supports(FieldKind::Bool) => {
                Some(a.cmp(&b))
            }
            (FieldValue::Bool(_), FieldValue::Bool(_)) => {
                return Err(ConfigError::InvalidOperator {
                    operator: self.operator,
                    kind: FieldKind::Bool,
                })
            }
            _ => {
                return Err(ConfigError::FieldKindMismatch {
                    name: self.field.clone(),
                    expected: self.kind,
                    found,
                })
            }
        };
        Ok(self.operator.holds(ordering))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FieldRegistry {
        let mut fields = FieldRegistry::new();
        fields.register_float_field("movementSpeed", 0.0).unwrap();
        fields.register_int_field("command", 0).unwrap();
        fields.register_bool_field("grounded", true).unwrap();
        fields
    }

    #[test]
    fn float_condition_round_trip() {
        let mut fields = registry();
        let greater = TransitionCondition::float("movementSpeed", Operator::Greater, 0.0);
        let equal = TransitionCondition::float("movementSpeed", Operator::Equal, 0.0);

        fields.set_float_field("movementSpeed", 5.0).unwrap();
        assert!(greater.evaluate(&fields).unwrap());
        assert!(!equal.evaluate(&fields).unwrap());

        fields.set_float_field("movementSpeed", 0.0).unwrap();
        assert!(!greater.evaluate(&fields).unwrap());
        assert!(equal.evaluate(&fields).unwrap());
    }

    #[test]
    fn int_operators() {
        let mut fields = registry();
        fields.set_int_field("command", 3).unwrap();

        let check = |op, literal| {
            TransitionCondition::int("command", op, literal)
                .evaluate(&fields)
                .unwrap()
        };

        assert!(check(Operator::Equal, 3));
        assert!(check(Operator::NotEqual, 2));
        assert!(check(Operator::GreaterOrEqual, 3));
        assert!(check(Operator::LessOrEqual, 3));
        assert!(check(Operator::Less, 4));
        assert!(!check(Operator::Greater, 3));
    }

    #[test]
    fn bool_equality() {
        let fields = registry();
        let grounded = TransitionCondition::bool("grounded", Operator::Equal, true).unwrap();
        let airborne = TransitionCondition::bool("grounded", Operator::NotEqual, true).unwrap();

        assert!(grounded.evaluate(&fields).unwrap());
        assert!(!airborne.evaluate(&fields).unwrap());
    }

    #[test]
    fn ordering_on_bool_is_rejected() {
        let result = TransitionCondition::bool("grounded", Operator::Greater, true);

        assert_eq!(
            result,
            Err(ConfigError::InvalidOperator {
                operator: Operator::Greater,
                kind: FieldKind::Bool,
            })
        );
    }

    #[test]
    fn literal_kind_must_match_declared_kind() {
        let result = TransitionCondition::new(
            FieldKind::Int,
            Operator::Equal,
            "command",
            FieldValue::Float(1.0),
        );

        assert!(matches!(result, Err(ConfigError::LiteralKindMismatch { .. })));
    }

    #[test]
    fn validate_catches_kind_mismatch() {
        let fields = registry();
        let condition = TransitionCondition::int("movementSpeed", Operator::Greater, 0);

        assert!(matches!(
            condition.validate(&fields),
            Err(ConfigError::FieldKindMismatch { .. })
        ));
        assert!(condition.evaluate(&fields).is_err());
    }

    #[test]
    fn validate_catches_unknown_field() {
        let fields = registry();
        let condition = TransitionCondition::float("jumpHeight", Operator::Greater, 0.0);

        assert_eq!(
            condition.validate(&fields),
            Err(ConfigError::UnknownField {
                name: "jumpHeight".to_string()
            })
        );
    }

    #[test]
    fn nan_is_only_not_equal() {
        let mut fields = registry();
        fields.set_float_field("movementSpeed", f32::NAN).unwrap();

        let equal = TransitionCondition::float("movementSpeed", Operator::Equal, 0.0);
        let not_equal = TransitionCondition::float("movementSpeed", Operator::NotEqual, 0.0);

        assert!(!equal.evaluate(&fields).unwrap());
        assert!(not_equal.evaluate(&fields).unwrap());
    }
}
