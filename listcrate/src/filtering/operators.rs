//! Filter operators and their argument-name suffixes.

use serde::Serialize;

use super::fields::{FieldDescriptor, FieldKind};

/// Comparison operators a generated filter argument can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Equality (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Set membership (IN)
    In,
    /// Case-insensitive literal substring match
    Has,
    /// Less than (<)
    Lt,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than or equal (<=)
    Lte,
}

impl FilterOperator {
    /// Get the argument-name suffix for this operator
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Eq => "",
            Self::Ne => "_ne",
            Self::In => "_in",
            Self::Has => "_has",
            Self::Lt => "_lt",
            Self::Gt => "_gt",
            Self::Gte => "_gte",
            Self::Lte => "_lte",
        }
    }

    /// Canonical argument name for `field` with this operator, e.g. `views_gte`.
    #[must_use]
    pub fn argument_name(self, field: &str) -> String {
        format!("{field}{}", self.suffix())
    }

    /// Operators generated for `field`, in declaration order.
    ///
    /// Kinds without an entry get no operators at all.
    #[must_use]
    pub fn for_field(field: &FieldDescriptor) -> Vec<Self> {
        const EQUALITY: [FilterOperator; 3] =
            [FilterOperator::Eq, FilterOperator::Ne, FilterOperator::In];
        const COMPARISON: [FilterOperator; 6] = [
            FilterOperator::Eq,
            FilterOperator::Ne,
            FilterOperator::Lt,
            FilterOperator::Gt,
            FilterOperator::Gte,
            FilterOperator::Lte,
        ];

        match &field.kind {
            FieldKind::Id => EQUALITY.to_vec(),
            FieldKind::String | FieldKind::Symbol | FieldKind::ObjectId => {
                let mut operators = if field.is_text {
                    Vec::new()
                } else {
                    EQUALITY.to_vec()
                };
                // no substring search on reference columns
                if !field.name.ends_with("_id") {
                    operators.push(Self::Has);
                }
                operators
            }
            FieldKind::Array(element) if **element == FieldKind::String => {
                vec![Self::Eq, Self::Ne, Self::In, Self::Has]
            }
            FieldKind::Integer | FieldKind::Float => COMPARISON.to_vec(),
            FieldKind::Boolean => vec![Self::Eq],
            FieldKind::Date | FieldKind::Time | FieldKind::DateTime => vec![Self::Gte, Self::Lte],
            FieldKind::Array(_) | FieldKind::Other => Vec::new(),
        }
    }
}
