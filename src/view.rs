//! What a renderer needs to draw a `when` tree.
//!
//! The view is a plain snapshot computed from the tree and the editor
//! configuration. It never mutates anything; gestures on its affordances are
//! forwarded to [`RuleEditor`](crate::RuleEditor) using the ids it carries.

use crate::tree::{ConditionId, ConditionTree, GroupId};
use crate::{EditorConfig, LogicOperator};

/// One group, with the affordances the renderer should show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub id: GroupId,
    /// The group's effective operator.
    pub operator: LogicOperator,
    /// Draw the group outline.
    pub outline: bool,
    /// Show a "remove group" action. Never set for the root group.
    pub removable: bool,
    /// Conditions first, then nested groups, each in stored order.
    pub rows: Vec<Row>,
    pub add_condition: bool,
    pub add_group: bool,
    /// The group holds at least one condition or nested group.
    pub has_items: bool,
}

/// A row inside a group. Every row shows its group's operator, so toggling it
/// from any row flips all siblings at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Condition {
        operator: LogicOperator,
        condition: ConditionId,
        /// Shown only while the group has more than one condition.
        removable: bool,
    },
    Group {
        operator: LogicOperator,
        group: GroupView,
    },
}

impl Row {
    #[must_use]
    pub fn operator(&self) -> LogicOperator {
        match self {
            Row::Condition { operator, .. } | Row::Group { operator, .. } => *operator,
        }
    }
}

impl GroupView {
    /// Condition ids of this group's own rows.
    pub fn conditions(&self) -> impl Iterator<Item = ConditionId> + '_ {
        self.rows.iter().filter_map(|row| match row {
            Row::Condition { condition, .. } => Some(*condition),
            Row::Group { .. } => None,
        })
    }

    /// Views of this group's nested groups.
    pub fn subgroups(&self) -> impl Iterator<Item = &GroupView> + '_ {
        self.rows.iter().filter_map(|row| match row {
            Row::Group { group, .. } => Some(group),
            Row::Condition { .. } => None,
        })
    }
}

/// Build the view of a tree. `None` if the tree has no root.
#[must_use]
pub fn render(tree: &ConditionTree, config: &EditorConfig) -> Option<GroupView> {
    let root = tree.root()?;
    Some(render_group(tree, root, true, config))
}

pub(crate) fn render_group(
    tree: &ConditionTree,
    id: GroupId,
    is_root: bool,
    config: &EditorConfig,
) -> GroupView {
    let mut view = GroupView {
        id,
        operator: LogicOperator::And,
        outline: config.show_group_outline(),
        removable: !config.readonly && !is_root,
        rows: Vec::new(),
        add_condition: config.show_add_condition(),
        add_group: config.show_add_group(),
        has_items: false,
    };
    let Some(node) = tree.group(id) else {
        return view;
    };

    let operator = node.effective_operator();
    let condition_removable = !config.readonly && node.items().len() > 1;

    view.operator = operator;
    view.has_items = !node.is_empty();
    view.rows = node
        .items()
        .iter()
        .map(|&condition| Row::Condition {
            operator,
            condition,
            removable: condition_removable,
        })
        .chain(node.groups().iter().map(|&child| Row::Group {
            operator,
            group: render_group(tree, child, false, config),
        }))
        .collect();
    view
}
