use std::fmt;
use std::ops::Not;

/// Boolean junction used by a [`Group`](super::Group).
///
/// A group with no operator set behaves as [`LogicOperator::And`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogicOperator {
    #[default]
    And,
    Or,
}

impl LogicOperator {
    /// The operator a group actually uses, treating unset as `And`.
    #[must_use]
    pub fn effective(operator: Option<LogicOperator>) -> LogicOperator {
        operator.unwrap_or_default()
    }

    /// Lower-case label shown next to each sibling row.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LogicOperator::And => "and",
            LogicOperator::Or => "or",
        }
    }
}

impl Not for LogicOperator {
    type Output = LogicOperator;

    fn not(self) -> LogicOperator {
        match self {
            LogicOperator::And => LogicOperator::Or,
            LogicOperator::Or => LogicOperator::And,
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOperator::And => write!(f, "AND"),
            LogicOperator::Or => write!(f, "OR"),
        }
    }
}
