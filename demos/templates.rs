use whentree::{view, ChangeCounter, Condition, EditorConfig, Group, GroupParent, Rule, RuleEditor};

fn main() {
    let config = EditorConfig::new()
        .hide_group_outline(true)
        .when_group_template(Group::or())
        .when_condition_template(
            Condition::new()
                .with("type", "attribute")
                .with("asset", "thermostat"),
        );

    let mut rule = Rule::from_notation("frost guard", r#"and [ { type: "timer", at: "03:00" } ]"#)
        .expect("valid notation");

    let mut dirty = false;
    {
        let mut editor = RuleEditor::new(&mut rule, &config, || dirty = true);
        let root = editor.ensure_root();
        if let Some(nested) = editor.add_group(GroupParent::Group(root)) {
            editor.add_condition(nested);
            editor.add_condition(nested);
        }
    }

    println!("dirty: {dirty}");
    println!("{rule}");

    if let Some(v) = view::render(&rule.when, &config) {
        println!(
            "outline: {}, add condition: {}, add group: {}",
            v.outline, v.add_condition, v.add_group
        );
    }
}
