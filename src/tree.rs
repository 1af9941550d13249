//! The live, editable condition tree.
//!
//! Groups and conditions live in two generational arenas and refer to each
//! other through [`GroupId`] / [`ConditionId`] handles. Every node held by the
//! arenas is reachable from the root exactly once: nodes enter the arenas only
//! through the add operations and are freed as soon as they are detached. A
//! handle to a detached node therefore stays stale forever, and every
//! operation given one quietly does nothing.

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::{Condition, Group, LogicOperator};

/// Handle to a group node inside a [`ConditionTree`].
///
/// Handles are only meaningful for the tree that issued them (or a clone of it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(Index);

/// Handle to a condition inside a [`ConditionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConditionId(Index);

/// Where [`ConditionTree::add_group`] attaches the new group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupParent {
    /// Replace the rule's whole `when` tree with the new group.
    Rule,
    /// Append to this group's nested groups.
    Group(GroupId),
}

/// A group as stored in the tree. Read-only outside this module.
#[derive(Debug, Clone, Default)]
pub struct GroupNode {
    operator: Option<LogicOperator>,
    items: Vec<ConditionId>,
    groups: Vec<GroupId>,
}

impl GroupNode {
    /// The operator as stored; `None` if it was never set.
    #[must_use]
    pub fn operator(&self) -> Option<LogicOperator> {
        self.operator
    }

    #[must_use]
    pub fn effective_operator(&self) -> LogicOperator {
        LogicOperator::effective(self.operator)
    }

    #[must_use]
    pub fn items(&self) -> &[ConditionId] {
        &self.items
    }

    #[must_use]
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.groups.is_empty()
    }
}

/// The `when` tree of a rule: an optional root group and everything below it.
///
/// Mutations report what they did instead of notifying anyone; see
/// [`RuleEditor`](crate::RuleEditor) for the notifying wrapper.
///
/// # Example
///
/// ```
/// use whentree::{ConditionTree, GroupParent, LogicOperator};
///
/// let mut tree = ConditionTree::new();
/// let root = tree.ensure_root();
/// let c1 = tree.add_condition(root, None).unwrap();
/// let nested = tree.add_group(GroupParent::Group(root), None).unwrap();
/// let c2 = tree.add_condition(nested, None).unwrap();
///
/// assert_eq!(tree.find_condition_parent(c1, root), Some(root));
/// assert_eq!(tree.find_condition_parent(c2, root), Some(nested));
/// assert_eq!(tree.toggle_operator(nested), Some(LogicOperator::Or));
///
/// assert!(tree.remove_group(nested));
/// assert_eq!(tree.find_condition_parent(c2, root), None);
/// ```
#[derive(Debug, Clone)]
pub struct ConditionTree {
    groups: Arena<GroupNode>,
    conditions: Arena<Condition>,
    root: Option<GroupId>,
}

impl Default for ConditionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionTree {
    /// A tree with no root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: Arena::new(),
            conditions: Arena::new(),
            root: None,
        }
    }

    /// Build a tree whose root is a deep copy of `group`.
    #[must_use]
    pub fn from_group(group: &Group) -> Self {
        let mut tree = Self::new();
        let root = tree.insert_subtree(group);
        tree.root = Some(root);
        tree
    }

    #[must_use]
    pub fn root(&self) -> Option<GroupId> {
        self.root
    }

    /// `true` when there is no root group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&GroupNode> {
        self.groups.get(id.0)
    }

    #[must_use]
    pub fn condition(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.get(id.0)
    }

    /// Mutable access to a condition's payload. The tree structure is unaffected.
    pub fn condition_mut(&mut self, id: ConditionId) -> Option<&mut Condition> {
        self.conditions.get_mut(id.0)
    }

    #[must_use]
    pub fn contains_group(&self, id: GroupId) -> bool {
        self.groups.contains(id.0)
    }

    #[must_use]
    pub fn contains_condition(&self, id: ConditionId) -> bool {
        self.conditions.contains(id.0)
    }

    /// Number of groups in the tree, root included.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// Set an empty root group if there is none. Returns the root either way.
    #[instrument(level = "debug", skip(self))]
    pub fn ensure_root(&mut self) -> GroupId {
        if let Some(root) = self.root {
            return root;
        }
        let root = GroupId(self.groups.insert(GroupNode::default()));
        self.root = Some(root);
        root
    }

    /// Flip a group's operator between `And` and `Or`, an unset operator
    /// counting as `And`. Returns the new operator, or `None` if `group` is not
    /// in the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_operator(&mut self, group: GroupId) -> Option<LogicOperator> {
        let Some(node) = self.groups.get_mut(group.0) else {
            debug!("group not in tree, toggle ignored");
            return None;
        };
        let toggled = !node.effective_operator();
        node.operator = Some(toggled);
        Some(toggled)
    }

    /// Add a new group, deep-copied from `template` or empty.
    ///
    /// With [`GroupParent::Rule`] the new group becomes the root and the
    /// previous tree is discarded. With [`GroupParent::Group`] it is appended
    /// to that group's nested groups; `None` is returned if the parent is not
    /// in the tree.
    #[instrument(level = "debug", skip(self, template))]
    pub fn add_group(&mut self, parent: GroupParent, template: Option<&Group>) -> Option<GroupId> {
        match parent {
            GroupParent::Rule => {
                if let Some(old) = self.root.take() {
                    self.free_subtree(old);
                }
                let id = self.instantiate(template);
                self.root = Some(id);
                Some(id)
            }
            GroupParent::Group(parent) => {
                if !self.groups.contains(parent.0) {
                    debug!("parent group not in tree, add ignored");
                    return None;
                }
                let id = self.instantiate(template);
                if let Some(node) = self.groups.get_mut(parent.0) {
                    node.groups.push(id);
                }
                Some(id)
            }
        }
    }

    /// Detach `group` and everything below it.
    ///
    /// Removing the root clears the whole tree. Returns `false` without
    /// touching anything if `group` is not part of the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_group(&mut self, group: GroupId) -> bool {
        let Some(root) = self.root else {
            debug!("tree has no root, removal ignored");
            return false;
        };

        if group == root {
            self.free_subtree(root);
            self.root = None;
            return true;
        }

        let Some(parent) = self.find_group_parent(group, root) else {
            debug!("group not found in tree, removal ignored");
            return false;
        };
        if let Some(node) = self.groups.get_mut(parent.0) {
            if let Some(index) = node.groups.iter().position(|&g| g == group) {
                node.groups.remove(index);
            }
        }
        self.free_subtree(group);
        true
    }

    /// Append a new condition to `parent`, deep-copied from `template` or empty.
    /// Returns `None` if `parent` is not in the tree.
    #[instrument(level = "debug", skip(self, template))]
    pub fn add_condition(
        &mut self,
        parent: GroupId,
        template: Option<&Condition>,
    ) -> Option<ConditionId> {
        let Some(node) = self.groups.get_mut(parent.0) else {
            debug!("parent group not in tree, add ignored");
            return None;
        };
        let condition = template.cloned().unwrap_or_default();
        let id = ConditionId(self.conditions.insert(condition));
        node.items.push(id);
        Some(id)
    }

    /// Detach `condition` from whichever group holds it.
    ///
    /// The last condition of a group may be removed; empty groups are valid.
    /// Returns `false` if the condition is not in the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_condition(&mut self, condition: ConditionId) -> bool {
        let Some(root) = self.root else {
            debug!("tree has no root, removal ignored");
            return false;
        };
        let Some(parent) = self.find_condition_parent(condition, root) else {
            debug!("condition not found in tree, removal ignored");
            return false;
        };
        if let Some(node) = self.groups.get_mut(parent.0) {
            if let Some(index) = node.items.iter().position(|&c| c == condition) {
                node.items.remove(index);
            }
        }
        self.conditions.remove(condition.0);
        true
    }

    /// Find the group whose items hold `target`, searching the subtree at
    /// `start` depth-first, parents before children, first match wins.
    #[must_use]
    pub fn find_condition_parent(&self, target: ConditionId, start: GroupId) -> Option<GroupId> {
        let node = self.groups.get(start.0)?;
        if node.items.contains(&target) {
            return Some(start);
        }
        node.groups
            .iter()
            .find_map(|&child| self.find_condition_parent(target, child))
    }

    /// Find the group whose nested groups hold `target`. Same search order as
    /// [`find_condition_parent`](Self::find_condition_parent). `start` itself
    /// is never reported as its own parent.
    #[must_use]
    pub fn find_group_parent(&self, target: GroupId, start: GroupId) -> Option<GroupId> {
        let node = self.groups.get(start.0)?;
        if node.groups.contains(&target) {
            return Some(start);
        }
        node.groups
            .iter()
            .find_map(|&child| self.find_group_parent(target, child))
    }

    /// All groups reachable from the root, in pre-order.
    #[must_use]
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut out = Vec::with_capacity(self.groups.len());
        if let Some(root) = self.root {
            self.collect_groups(root, &mut out);
        }
        out
    }

    /// All conditions reachable from the root: each group's items, then its
    /// nested groups, in pre-order.
    #[must_use]
    pub fn condition_ids(&self) -> Vec<ConditionId> {
        self.group_ids()
            .into_iter()
            .filter_map(|id| self.groups.get(id.0))
            .flat_map(|node| node.items.iter().copied())
            .collect()
    }

    /// Detached deep copy of the subtree at `id`.
    #[must_use]
    pub fn to_group(&self, id: GroupId) -> Option<Group> {
        let node = self.groups.get(id.0)?;
        Some(Group {
            operator: node.operator,
            items: node
                .items
                .iter()
                .filter_map(|c| self.conditions.get(c.0).cloned())
                .collect(),
            groups: node
                .groups
                .iter()
                .filter_map(|&g| self.to_group(g))
                .collect(),
        })
    }

    /// Detached deep copy of the whole tree, `None` if there is no root.
    #[must_use]
    pub fn root_group(&self) -> Option<Group> {
        self.root.and_then(|root| self.to_group(root))
    }

    fn collect_groups(&self, id: GroupId, out: &mut Vec<GroupId>) {
        if let Some(node) = self.groups.get(id.0) {
            out.push(id);
            for &child in &node.groups {
                self.collect_groups(child, out);
            }
        }
    }

    fn instantiate(&mut self, template: Option<&Group>) -> GroupId {
        match template {
            Some(template) => self.insert_subtree(template),
            None => GroupId(self.groups.insert(GroupNode::default())),
        }
    }

    fn insert_subtree(&mut self, group: &Group) -> GroupId {
        let items = group
            .items
            .iter()
            .map(|c| ConditionId(self.conditions.insert(c.clone())))
            .collect();
        let groups = group
            .groups
            .iter()
            .map(|g| self.insert_subtree(g))
            .collect();
        GroupId(self.groups.insert(GroupNode {
            operator: group.operator,
            items,
            groups,
        }))
    }

    fn free_subtree(&mut self, id: GroupId) {
        let Some(node) = self.groups.remove(id.0) else {
            return;
        };
        for item in node.items {
            self.conditions.remove(item.0);
        }
        for child in node.groups {
            self.free_subtree(child);
        }
    }
}
