use std::collections::BTreeMap;
use std::fmt;

use super::value::write_quoted;
use super::Value;

/// An atomic leaf predicate.
///
/// The tree treats the payload as opaque: it is a set of named attributes
/// (asset filters, attribute predicates, timers and so on) that only the
/// condition editor interprets. Cloning a condition is a full deep copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    attributes: BTreeMap<String, Value>,
}

impl Condition {
    /// Create a condition with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, builder style.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set an attribute, returning the previous value if there was one.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(key.to_owned(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attributes.is_empty() {
            return write!(f, "{{}}");
        }
        write!(f, "{{ ")?;
        for (i, (key, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if is_bare_key(key) {
                f.write_str(key)?;
            } else {
                write_quoted(f, key)?;
            }
            write!(f, ": {value}")?;
        }
        write!(f, " }}")
    }
}

/// Keys the notation can carry unquoted.
fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_attributes() {
        let c = Condition::new()
            .with("asset", "sensor-1")
            .with("threshold", 21.5_f64);
        assert_eq!(c.get("asset"), Some(&Value::String("sensor-1".into())));
        assert_eq!(c.get("threshold"), Some(&Value::Float(21.5)));
        assert_eq!(c.get("missing"), None);
    }

    #[test]
    fn set_returns_previous() {
        let mut c = Condition::new().with("x", 1_i64);
        assert_eq!(c.set("x", 2_i64), Some(Value::Int(1)));
        assert_eq!(c.remove("x"), Some(Value::Int(2)));
        assert!(c.is_empty());
    }

    #[test]
    fn clone_is_independent() {
        let original = Condition::new().with("x", 1_i64);
        let mut copy = original.clone();
        copy.set("x", 99_i64);
        assert_eq!(original.get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn display() {
        assert_eq!(Condition::new().to_string(), "{}");
        let c = Condition::new().with("b", true).with("a", "x");
        assert_eq!(c.to_string(), r#"{ a: "x", b: true }"#);
    }

    #[test]
    fn display_quotes_keys_that_are_not_identifiers() {
        let c = Condition::new()
            .with("asset-id", "a1")
            .with("2nd", 2_i64)
            .with("", true)
            .with("say \"hi\"", false)
            .with("asset.type", "lamp");
        assert_eq!(
            c.to_string(),
            r#"{ "": true, "2nd": 2, "asset-id": "a1", asset.type: "lamp", "say \"hi\"": false }"#
        );
    }
}
