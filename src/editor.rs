use tracing::{debug, instrument, trace};

use crate::tree::{ConditionId, GroupId, GroupParent};
use crate::view::{self, GroupView};
use crate::{Condition, EditorConfig, Rule};

/// Receives a signal after every committed edit of a rule's `when` tree.
///
/// The signal carries no payload: consumers re-read the [`Rule`] they handed
/// to the editor, which is mutated in place. Any `FnMut()` closure works as a
/// notifier that only cares about [`changed`](Self::changed).
pub trait ChangeNotifier {
    /// The rule changed and should be considered dirty.
    fn changed(&mut self);

    /// The rendered view is stale. Always follows [`changed`](Self::changed).
    fn render_requested(&mut self) {}
}

impl<F: FnMut()> ChangeNotifier for F {
    fn changed(&mut self) {
        (*self)();
    }
}

/// Counts notifications. Handy for dirty tracking and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounter {
    pub changes: usize,
    pub renders: usize,
}

impl ChangeNotifier for ChangeCounter {
    fn changed(&mut self) {
        self.changes += 1;
    }

    fn render_requested(&mut self) {
        self.renders += 1;
    }
}

/// Edits a rule's `when` tree, notifying after every edit that changed it.
///
/// Edits that find nothing to act on (stale handles, no root) return
/// `false` / `None` and notify nobody. Templates for new nodes come from the
/// [`EditorConfig`]. Read-only mode only affects the rendered view; the
/// editing methods themselves are always available.
///
/// # Example
///
/// ```
/// use whentree::{ChangeCounter, EditorConfig, GroupParent, Rule, RuleEditor};
///
/// let mut rule = Rule::new("porch lights");
/// let config = EditorConfig::new();
/// let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());
///
/// let root = editor.add_group(GroupParent::Rule).unwrap();
/// editor.add_condition(root).unwrap();
/// editor.toggle_operator(root);
///
/// assert_eq!(editor.notifier().changes, 3);
/// assert_eq!(rule.when.condition_count(), 1);
/// ```
pub struct RuleEditor<'a, N> {
    rule: &'a mut Rule,
    config: &'a EditorConfig,
    notifier: N,
}

impl<'a, N: ChangeNotifier> RuleEditor<'a, N> {
    pub fn new(rule: &'a mut Rule, config: &'a EditorConfig, notifier: N) -> Self {
        Self {
            rule,
            config,
            notifier,
        }
    }

    #[must_use]
    pub fn rule(&self) -> &Rule {
        self.rule
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        self.config
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Give the notifier back, ending the edit session.
    pub fn into_notifier(self) -> N {
        self.notifier
    }

    /// Give the rule an empty root group if it has none. Never notifies.
    pub fn ensure_root(&mut self) -> GroupId {
        self.rule.when.ensure_root()
    }

    #[instrument(level = "debug", skip(self), fields(rule = %self.rule.name))]
    pub fn toggle_operator(&mut self, group: GroupId) -> bool {
        let toggled = self.rule.when.toggle_operator(group);
        if let Some(operator) = toggled {
            debug!(%operator, "operator toggled");
            self.notify();
        }
        toggled.is_some()
    }

    /// Add a group built from the configured group template.
    ///
    /// [`GroupParent::Rule`] replaces the whole `when` tree.
    #[instrument(level = "debug", skip(self), fields(rule = %self.rule.name))]
    pub fn add_group(&mut self, parent: GroupParent) -> Option<GroupId> {
        let template = self.config.templates.when_group.as_ref();
        let id = self.rule.when.add_group(parent, template)?;
        self.notify();
        Some(id)
    }

    #[instrument(level = "debug", skip(self), fields(rule = %self.rule.name))]
    pub fn remove_group(&mut self, group: GroupId) -> bool {
        let removed = self.rule.when.remove_group(group);
        if removed {
            self.notify();
        }
        removed
    }

    /// Append a condition built from the configured condition template.
    #[instrument(level = "debug", skip(self), fields(rule = %self.rule.name))]
    pub fn add_condition(&mut self, parent: GroupId) -> Option<ConditionId> {
        let template = self.config.templates.when_condition.as_ref();
        let id = self.rule.when.add_condition(parent, template)?;
        self.notify();
        Some(id)
    }

    #[instrument(level = "debug", skip(self), fields(rule = %self.rule.name))]
    pub fn remove_condition(&mut self, condition: ConditionId) -> bool {
        let removed = self.rule.when.remove_condition(condition);
        if removed {
            self.notify();
        }
        removed
    }

    /// Edit a condition's payload in place. Notifies if the condition exists.
    #[instrument(level = "debug", skip(self, edit), fields(rule = %self.rule.name))]
    pub fn update_condition(
        &mut self,
        condition: ConditionId,
        edit: impl FnOnce(&mut Condition),
    ) -> bool {
        let Some(payload) = self.rule.when.condition_mut(condition) else {
            debug!("condition not in tree, update ignored");
            return false;
        };
        edit(payload);
        self.notify();
        true
    }

    /// Render the tree, creating an empty root first if there is none.
    pub fn view(&mut self) -> GroupView {
        let root = self.rule.when.ensure_root();
        view::render_group(&self.rule.when, root, true, self.config)
    }

    fn notify(&mut self) {
        trace!("notifying change");
        self.notifier.changed();
        self.notifier.render_requested();
    }
}
