use std::sync::Once;

use tracing_subscriber::EnvFilter;
use whentree::{
    view, ChangeCounter, Condition, EditorConfig, Group, GroupParent, LogicOperator, Row, Rule,
    RuleEditor,
};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness. Set `RUST_LOG=whentree=debug`
/// to see the edit log.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn c(n: i64) -> Condition {
    Condition::new().with("n", n)
}

#[test]
fn remove_toggle_add_each_notify_once() {
    init_tracing();
    let mut rule = Rule::new("r").with_when(&Group::and().item(c(1)).item(c(2)));
    let config = EditorConfig::new();
    let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());
    let root = editor.ensure_root();
    let c1 = editor.rule().when.group(root).unwrap().items()[0];

    assert!(editor.remove_condition(c1));
    assert_eq!(editor.notifier().changes, 1);
    assert_eq!(
        editor.rule().when.root_group(),
        Some(Group::and().item(c(2)))
    );

    assert!(editor.toggle_operator(root));
    assert_eq!(editor.notifier().changes, 2);
    assert_eq!(
        editor.rule().when.group(root).unwrap().operator(),
        Some(LogicOperator::Or)
    );

    let added = editor.add_group(GroupParent::Group(root)).unwrap();
    assert_eq!(editor.notifier().changes, 3);
    assert_eq!(editor.rule().when.group(root).unwrap().groups(), &[added]);
    assert_eq!(
        editor.rule().when.root_group(),
        Some(Group::or().item(c(2)).group(Group::new()))
    );
}

#[test]
fn add_group_on_rule_seeds_empty_rule() {
    init_tracing();
    let mut rule = Rule::new("r");
    let config = EditorConfig::new();
    let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());

    let root = editor.add_group(GroupParent::Rule).unwrap();
    assert_eq!(editor.rule().when.root(), Some(root));
    assert_eq!(editor.rule().when.root_group(), Some(Group::new()));
    assert_eq!(editor.notifier().changes, 1);
}

#[test]
fn add_group_on_rule_discards_existing_tree() {
    init_tracing();
    let mut rule = Rule::new("r").with_when(&Group::or().item(c(1)).group(Group::and()));
    let config = EditorConfig::new().when_group_template(Group::and().item(c(9)));
    let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());

    editor.add_group(GroupParent::Rule).unwrap();
    assert_eq!(
        editor.rule().when.root_group(),
        Some(Group::and().item(c(9)))
    );
    assert_eq!(editor.rule().when.group_count(), 1);
}

#[test]
fn removing_root_clears_when() {
    init_tracing();
    let mut rule = Rule::new("r").with_when(&Group::and().item(c(1)));
    let config = EditorConfig::new();
    let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());
    let root = editor.ensure_root();

    assert!(editor.remove_group(root));
    assert!(editor.rule().when.is_empty());
    assert_eq!(editor.notifier().changes, 1);

    // Second removal finds no root.
    assert!(!editor.remove_group(root));
    assert_eq!(editor.notifier().changes, 1);
}

#[test]
fn view_lazily_creates_root() {
    init_tracing();
    let mut rule = Rule::new("r");
    let config = EditorConfig::new();
    let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());

    let view = editor.view();
    assert!(view.rows.is_empty());
    assert!(!view.removable);
    assert!(view.add_condition && view.add_group);
    assert_eq!(editor.notifier().changes, 0);
    assert_eq!(rule.when.root(), Some(view.id));
}

#[test]
fn view_gestures_drive_the_editor() {
    init_tracing();
    let mut rule = Rule::new("r");
    let config = EditorConfig::new().when_condition_template(Condition::new().with("type", "attribute"));
    let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());

    // Click "add condition" twice and "add group" once on the root.
    let root_view = editor.view();
    editor.add_condition(root_view.id).unwrap();
    editor.add_condition(root_view.id).unwrap();
    editor.add_group(GroupParent::Group(root_view.id)).unwrap();

    let view = editor.view();
    assert!(view.has_items);
    let removable: Vec<bool> = view
        .rows
        .iter()
        .filter_map(|r| match r {
            Row::Condition { removable, .. } => Some(*removable),
            Row::Group { .. } => None,
        })
        .collect();
    assert_eq!(removable, vec![true, true]);

    // Click "remove" on the first condition: the last one left loses its
    // remove action, though the editor itself would still allow it.
    let first = view.conditions().next().unwrap();
    assert!(editor.remove_condition(first));
    let view = editor.view();
    assert!(matches!(
        view.rows[0],
        Row::Condition {
            removable: false,
            ..
        }
    ));
    let last = view.conditions().next().unwrap();
    assert!(editor.remove_condition(last));

    // Click the operator label on the nested group row.
    let nested = view.subgroups().next().unwrap().id;
    assert!(editor.toggle_operator(view.id));
    let view = editor.view();
    assert_eq!(view.rows[0].operator(), LogicOperator::Or);
    assert_eq!(view.subgroups().next().unwrap().id, nested);

    assert_eq!(editor.notifier().changes, 6);
}

#[test]
fn readonly_view_over_existing_tree() {
    init_tracing();
    let rule = Rule::from_notation("r", "or [ {n: 1}, {n: 2}, and [ {n: 3} ] ]").unwrap();
    let config = EditorConfig::new().readonly(true);
    let view = view::render(&rule.when, &config).unwrap();
    assert!(!view.add_condition && !view.add_group);
    assert!(view.subgroups().all(|g| !g.removable));
}

#[test]
fn condition_templates_are_independent_copies() {
    init_tracing();
    let mut rule = Rule::new("r");
    let config = EditorConfig::new().when_condition_template(Condition::new().with("type", "timer"));
    let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());
    let root = editor.ensure_root();
    let a = editor.add_condition(root).unwrap();
    let b = editor.add_condition(root).unwrap();

    assert!(editor.update_condition(a, |cond| {
        cond.set("type", "attribute");
    }));
    assert_eq!(
        editor.rule().when.condition(b),
        Some(&Condition::new().with("type", "timer"))
    );
    assert_eq!(
        editor.config().templates.when_condition,
        Some(Condition::new().with("type", "timer"))
    );
}
