use std::fmt;

use super::Group;
use crate::tree::ConditionTree;

/// A named rule owning its `when` condition tree.
///
/// An empty [`ConditionTree`] stands for an absent `when` clause.
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub name: String,
    pub when: ConditionTree,
}

impl Rule {
    /// A rule with no `when` clause.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            when: ConditionTree::new(),
        }
    }

    /// Set the `when` clause to a deep copy of `group`.
    #[must_use]
    pub fn with_when(mut self, group: &Group) -> Self {
        self.when = ConditionTree::from_group(group);
        self
    }

    /// Parse the `when` clause from the textual notation.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`](crate::parse::ParseError) if `when` is not valid notation.
    pub fn from_notation(name: &str, when: &str) -> Result<Self, crate::parse::ParseError> {
        let group = crate::parse::parse(when)?;
        Ok(Self::new(name).with_when(&group))
    }
}

#[cfg(feature = "snapshot")]
impl Rule {
    /// Serialize this rule to a byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self)
    }

    /// Deserialize a rule previously produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// Serialize this rule and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and deserialize the rule it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.when.root_group() {
            Some(group) => write!(f, "rule {}: {group}", self.name),
            None => write!(f, "rule {}: <no when>", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Condition;

    #[test]
    fn new_rule_has_no_when() {
        let rule = Rule::new("lights");
        assert_eq!(rule.name, "lights");
        assert!(rule.when.is_empty());
        assert_eq!(rule.to_string(), "rule lights: <no when>");
    }

    #[test]
    fn with_when_copies_group() {
        let group = Group::or().item(Condition::new().with("asset", "lamp"));
        let rule = Rule::new("r").with_when(&group);
        assert_eq!(rule.when.root_group(), Some(group));
        assert_eq!(rule.to_string(), r#"rule r: or [ { asset: "lamp" } ]"#);
    }

    #[test]
    fn from_notation_parses_when() {
        let rule = Rule::from_notation("r", "and [ {x: 1}, or [] ]").unwrap();
        assert_eq!(rule.when.group_count(), 2);
        assert_eq!(rule.when.condition_count(), 1);
    }

    #[test]
    fn from_notation_rejects_garbage() {
        assert!(Rule::from_notation("r", "and [ {x: } ]").is_err());
    }
}
