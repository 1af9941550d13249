mod error;
mod grammar;

pub use error::ParseError;

use crate::Group;

/// Parse a group written in the textual notation.
///
/// ```
/// use whentree::{parse::parse, LogicOperator};
///
/// let group = parse(r#"or [ { asset: "lamp" }, and [ {} ] ]"#).unwrap();
/// assert_eq!(group.operator, Some(LogicOperator::Or));
/// assert_eq!(group.items.len(), 1);
/// assert_eq!(group.groups.len(), 1);
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid notation.
pub fn parse(input: &str) -> Result<Group, ParseError> {
    use winnow::Parser;
    grammar::parse_group
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}
