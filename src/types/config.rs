use super::{Condition, Group};

/// Settings supplied by whoever owns the rule being edited.
///
/// # Example
///
/// ```
/// use whentree::{Condition, EditorConfig, Group};
///
/// let config = EditorConfig::new()
///     .hide_add_group(true)
///     .when_condition_template(Condition::new().with("type", "attribute"))
///     .when_group_template(Group::or());
/// assert!(config.controls.hide_add_group);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    /// Suppresses every mutation affordance in the rendered view.
    pub readonly: bool,
    pub controls: Controls,
    pub templates: Templates,
}

/// Independent switches for individual affordances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub hide_add_condition: bool,
    pub hide_add_group: bool,
    pub hide_group_outline: bool,
}

/// Prototypes deep-copied into every new node. `None` means "start empty".
#[derive(Debug, Clone, Default)]
pub struct Templates {
    pub when_group: Option<Group>,
    pub when_condition: Option<Condition>,
}

impl EditorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    #[must_use]
    pub fn hide_add_condition(mut self, hide: bool) -> Self {
        self.controls.hide_add_condition = hide;
        self
    }

    #[must_use]
    pub fn hide_add_group(mut self, hide: bool) -> Self {
        self.controls.hide_add_group = hide;
        self
    }

    #[must_use]
    pub fn hide_group_outline(mut self, hide: bool) -> Self {
        self.controls.hide_group_outline = hide;
        self
    }

    #[must_use]
    pub fn when_group_template(mut self, template: Group) -> Self {
        self.templates.when_group = Some(template);
        self
    }

    #[must_use]
    pub fn when_condition_template(mut self, template: Condition) -> Self {
        self.templates.when_condition = Some(template);
        self
    }

    /// Whether the view should offer an "add condition" action.
    #[must_use]
    pub fn show_add_condition(&self) -> bool {
        !self.readonly && !self.controls.hide_add_condition
    }

    /// Whether the view should offer an "add group" action.
    #[must_use]
    pub fn show_add_group(&self) -> bool {
        !self.readonly && !self.controls.hide_add_group
    }

    #[must_use]
    pub fn show_group_outline(&self) -> bool {
        !self.controls.hide_group_outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_everything() {
        let config = EditorConfig::new();
        assert!(config.show_add_condition());
        assert!(config.show_add_group());
        assert!(config.show_group_outline());
        assert!(config.templates.when_group.is_none());
        assert!(config.templates.when_condition.is_none());
    }

    #[test]
    fn readonly_hides_add_actions_but_not_outline() {
        let config = EditorConfig::new().readonly(true);
        assert!(!config.show_add_condition());
        assert!(!config.show_add_group());
        assert!(config.show_group_outline());
    }

    #[test]
    fn flags_are_independent() {
        let config = EditorConfig::new().hide_add_condition(true);
        assert!(!config.show_add_condition());
        assert!(config.show_add_group());

        let config = EditorConfig::new()
            .hide_add_group(true)
            .hide_group_outline(true);
        assert!(config.show_add_condition());
        assert!(!config.show_add_group());
        assert!(!config.show_group_outline());
    }
}
