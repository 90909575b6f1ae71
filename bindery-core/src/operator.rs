//! SQL operator types and conversions

use std::fmt::{self, Display};

/// Type-safe SQL comparison operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator(&'static str);

impl Operator {
    pub const EQ: Self = Operator("=");
    pub const NEQ: Self = Operator("!=");
    pub const GT: Self = Operator(">");
    pub const LT: Self = Operator("<");
    pub const GTE: Self = Operator(">=");
    pub const LTE: Self = Operator("<=");
    pub const LIKE: Self = Operator("LIKE");

    /// Create a custom operator for database-specific comparisons
    ///
    /// # Examples
    /// ```
    /// use bindery_core::Operator;
    ///
    /// let nullsafe_eq = Operator::custom("<=>");
    /// assert_eq!(nullsafe_eq.as_str(), "<=>");
    /// ```
    pub const fn custom(op: &'static str) -> Self {
        Operator(op)
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &str {
        self.0
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for types that can be converted to SQL operators
pub trait IntoOperator {
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

/// Allow string literals for common SQL operators with validation
impl IntoOperator for &str {
    fn into_operator(self) -> Operator {
        match self {
            "=" => Operator::EQ,
            "!=" => Operator::NEQ,
            ">" => Operator::GT,
            "<" => Operator::LT,
            ">=" => Operator::GTE,
            "<=" => Operator::LTE,
            "LIKE" | "like" => Operator::LIKE,
            _ => panic!(
                "Unknown operator '{}'. Use the Operator constants or Operator::custom(\"{}\").",
                self, self
            ),
        }
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::EQ;
    pub const NEQ: Operator = Operator::NEQ;
    pub const GT: Operator = Operator::GT;
    pub const LT: Operator = Operator::LT;
    pub const GTE: Operator = Operator::GTE;
    pub const LTE: Operator = Operator::LTE;
    pub const LIKE: Operator = Operator::LIKE;
}
