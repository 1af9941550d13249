use std::fmt;
use std::str::FromStr;

use super::{Condition, LogicOperator};

/// A detached, owned boolean junction: conditions plus nested groups.
///
/// This is the value form of a group. Templates, snapshots and the textual
/// notation all use it; the live, editable form is a
/// [`ConditionTree`](crate::ConditionTree). Inserting a `Group` into a tree
/// deep-copies it, so a template is never aliased by the nodes built from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub operator: Option<LogicOperator>,
    pub items: Vec<Condition>,
    pub groups: Vec<Group>,
}

impl Group {
    /// An empty group with no operator set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn and() -> Self {
        Self::new().operator(LogicOperator::And)
    }

    #[must_use]
    pub fn or() -> Self {
        Self::new().operator(LogicOperator::Or)
    }

    #[must_use]
    pub fn operator(mut self, operator: LogicOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Append a condition.
    #[must_use]
    pub fn item(mut self, condition: Condition) -> Self {
        self.items.push(condition);
        self
    }

    /// Append a nested group.
    #[must_use]
    pub fn group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// The operator in effect, treating unset as `And`.
    #[must_use]
    pub fn effective_operator(&self) -> LogicOperator {
        LogicOperator::effective(self.operator)
    }

    /// `true` when the group has neither conditions nor nested groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.groups.is_empty()
    }

    /// Number of groups in this subtree, including `self`.
    #[must_use]
    pub fn group_count(&self) -> usize {
        1 + self.groups.iter().map(Group::group_count).sum::<usize>()
    }

    /// Read a file written in the textual notation.
    ///
    /// # Errors
    ///
    /// Returns [`WhenTreeError`](crate::WhenTreeError) on I/O or parse failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::WhenTreeError> {
        let input = std::fs::read_to_string(path)?;
        Ok(crate::parse::parse(&input)?)
    }

    /// Number of conditions anywhere in this subtree.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.items.len()
            + self
                .groups
                .iter()
                .map(Group::condition_count)
                .sum::<usize>()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.operator {
            Some(LogicOperator::And) => "and",
            Some(LogicOperator::Or) => "or",
            None => "group",
        };
        write!(f, "{keyword} [")?;
        let mut first = true;
        for item in &self.items {
            if !first {
                write!(f, ",")?;
            }
            write!(f, " {item}")?;
            first = false;
        }
        for group in &self.groups {
            if !first {
                write!(f, ",")?;
            }
            write!(f, " {group}")?;
            first = false;
        }
        if first {
            write!(f, "]")
        } else {
            write!(f, " ]")
        }
    }
}

impl FromStr for Group {
    type Err = crate::parse::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_and_unset() {
        let g = Group::new();
        assert!(g.is_empty());
        assert_eq!(g.operator, None);
        assert_eq!(g.effective_operator(), LogicOperator::And);
    }

    #[test]
    fn builder_appends_in_order() {
        let g = Group::or()
            .item(Condition::new().with("n", 1_i64))
            .item(Condition::new().with("n", 2_i64))
            .group(Group::new());
        assert_eq!(g.operator, Some(LogicOperator::Or));
        assert_eq!(g.items.len(), 2);
        assert_eq!(g.items[1], Condition::new().with("n", 2_i64));
        assert_eq!(g.groups.len(), 1);
    }

    #[test]
    fn counts_cover_subtree() {
        let g = Group::and()
            .item(Condition::new())
            .group(Group::or().item(Condition::new()).group(Group::new()));
        assert_eq!(g.group_count(), 3);
        assert_eq!(g.condition_count(), 2);
    }

    #[test]
    fn display_empty() {
        assert_eq!(Group::new().to_string(), "group []");
        assert_eq!(Group::and().to_string(), "and []");
    }

    #[test]
    fn display_items_before_groups() {
        let g = Group::and()
            .group(Group::or())
            .item(Condition::new().with("asset", "a1"));
        assert_eq!(g.to_string(), r#"and [ { asset: "a1" }, or [] ]"#);
    }

    #[test]
    fn display_reparses() {
        let g = Group::or()
            .item(Condition::new().with("x", 1.0_f64).with("label", "say \"hi\""))
            .group(Group::new().item(Condition::new()));
        let parsed: Group = g.to_string().parse().unwrap();
        assert_eq!(parsed, g);
    }
}
