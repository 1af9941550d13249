use whentree::{view, ChangeCounter, EditorConfig, GroupParent, Row, Rule, RuleEditor};

fn print_view(group: &view::GroupView, rule: &Rule, depth: usize) {
    let pad = "  ".repeat(depth);
    println!("{pad}group ({})", group.operator);
    for row in &group.rows {
        match row {
            Row::Condition {
                operator,
                condition,
                removable,
            } => {
                let text = rule
                    .when
                    .condition(*condition)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let remove = if *removable { " [x]" } else { "" };
                println!("{pad}  {} {text}{remove}", operator.label());
            }
            Row::Group { operator, group } => {
                println!("{pad}  {}", operator.label());
                print_view(group, rule, depth + 2);
            }
        }
    }
}

fn main() {
    let mut rule = Rule::new("porch lights");
    let config = EditorConfig::new();
    let mut editor = RuleEditor::new(&mut rule, &config, ChangeCounter::default());

    let root = editor.add_group(GroupParent::Rule).expect("rule parent always accepts a group");
    let motion = editor.add_condition(root).expect("root is in the tree");
    editor.update_condition(motion, |c| {
        c.set("asset", "porch sensor");
        c.set("motion", true);
    });

    let dark = editor
        .add_group(GroupParent::Group(root))
        .expect("root is in the tree");
    editor.toggle_operator(dark);
    for time in ["21:00", "05:00"] {
        if let Some(id) = editor.add_condition(dark) {
            editor.update_condition(id, |c| {
                c.set("after", time);
            });
        }
    }

    let counter = *editor.notifier();
    println!("{} edits, {} re-renders requested", counter.changes, counter.renders);

    if let Some(v) = view::render(&rule.when, &config) {
        print_view(&v, &rule, 0);
    }
    println!("{rule}");
}
