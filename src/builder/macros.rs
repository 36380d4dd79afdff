//! Macros for ergonomic condition construction.

/// Build a [`TransitionCondition`](crate::core::TransitionCondition) from a
/// comparison.
///
/// The field kind comes first, then the field name, an operator and the
/// literal. Boolean fields only accept `==` and `!=`; any other operator on
/// `bool` fails to compile.
///
/// # Example
///
/// ```
/// use commandable_fsm::condition;
/// use commandable_fsm::core::{FieldKind, Operator};
///
/// let moving = condition!(float "movementSpeed" > 0.0);
/// assert_eq!(moving.operator(), Operator::Greater);
///
/// let armed = condition!(int "command" == 3);
/// assert_eq!(armed.kind(), FieldKind::Int);
///
/// let airborne = condition!(bool "grounded" != true);
/// assert_eq!(airborne.operator(), Operator::NotEqual);
/// ```
#[macro_export]
macro_rules! condition {
    (int $field:literal $op:tt $value:expr) => {
        $crate::core::TransitionCondition::int($field, $crate::__operator!($op), $value)
    };
    (float $field:literal $op:tt $value:expr) => {
        $crate::core::TransitionCondition::float($field, $crate::__operator!($op), $value)
    };
    (bool $field:literal == $value:expr) => {
        $crate::core::TransitionCondition::bool_eq($field, $value)
    };
    (bool $field:literal != $value:expr) => {
        $crate::core::TransitionCondition::bool_ne($field, $value)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __operator {
    (==) => {
        $crate::core::Operator::Equal
    };
    (!=) => {
        $crate::core::Operator::NotEqual
    };
    (>) => {
        $crate::core::Operator::Greater
    };
    (>=) => {
        $crate::core::Operator::GreaterOrEqual
    };
    (<) => {
        $crate::core::Operator::Less
    };
    (<=) => {
        $crate::core::Operator::LessOrEqual
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{FieldRegistry, FieldValue, Operator};

    #[test]
    fn condition_macro_maps_operators() {
        assert_eq!(condition!(int "a" == 1).operator(), Operator::Equal);
        assert_eq!(condition!(int "a" != 1).operator(), Operator::NotEqual);
        assert_eq!(condition!(int "a" > 1).operator(), Operator::Greater);
        assert_eq!(condition!(int "a" >= 1).operator(), Operator::GreaterOrEqual);
        assert_eq!(condition!(int "a" < 1).operator(), Operator::Less);
        assert_eq!(condition!(int "a" <= 1).operator(), Operator::LessOrEqual);
    }

    #[test]
    fn condition_macro_keeps_literal() {
        let condition = condition!(float "movementSpeed" >= -1.5);

        assert_eq!(condition.field(), "movementSpeed");
        assert_eq!(condition.literal(), FieldValue::Float(-1.5));
    }

    #[test]
    fn bool_conditions_evaluate() {
        let mut fields = FieldRegistry::new();
        fields.register_bool_field("grounded", false).unwrap();

        assert!(condition!(bool "grounded" == false).evaluate(&fields).unwrap());
        assert!(!condition!(bool "grounded" != false).evaluate(&fields).unwrap());
    }
}
