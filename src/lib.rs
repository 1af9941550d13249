//! Editable AND/OR condition trees for the `when` clause of a rule.
//!
//! A [`Rule`] owns a [`ConditionTree`]: groups combining conditions and nested
//! groups under a single [`LogicOperator`] each. [`RuleEditor`] applies edits
//! and tells a [`ChangeNotifier`] about every one that changed the tree;
//! [`view::render`] produces what a renderer needs to draw it.

mod editor;
mod error;
mod tree;
mod types;

pub mod parse;
#[cfg(feature = "snapshot")]
pub mod serial;
pub mod view;

pub use editor::{ChangeCounter, ChangeNotifier, RuleEditor};
pub use error::WhenTreeError;
pub use tree::{ConditionId, ConditionTree, GroupId, GroupNode, GroupParent};
pub use types::{
    Condition, Controls, EditorConfig, Group, LogicOperator, Rule, Templates, Value,
};
pub use view::{GroupView, Row};

#[cfg(feature = "snapshot")]
pub use serial::{DeserializeError, SerializeError};
