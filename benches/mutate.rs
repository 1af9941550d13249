use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use whentree::{Condition, ConditionTree, Group, GroupParent};

fn wide_tree(groups: usize, items: usize) -> ConditionTree {
    let mut root = Group::or();
    for g in 0..groups {
        let mut child = Group::and();
        for i in 0..items {
            child = child.item(Condition::new().with("slot", (g * items + i) as i64));
        }
        root = root.group(child);
    }
    ConditionTree::from_group(&root)
}

fn bench_add_remove_condition(c: &mut Criterion) {
    let template = Condition::new().with("type", "attribute").with("asset", "meter");
    c.bench_function("add_remove_condition_in_last_group", |b| {
        b.iter_batched(
            || wide_tree(50, 10),
            |mut tree| {
                let parent = *tree.group_ids().last().unwrap();
                let id = tree.add_condition(parent, Some(&template)).unwrap();
                black_box(tree.remove_condition(id))
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_remove_group(c: &mut Criterion) {
    c.bench_function("remove_last_group", |b| {
        b.iter_batched(
            || wide_tree(50, 10),
            |mut tree| {
                let target = *tree.group_ids().last().unwrap();
                black_box(tree.remove_group(target))
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_replace_root(c: &mut Criterion) {
    let template = Group::and().item(Condition::new());
    c.bench_function("replace_root_with_template", |b| {
        b.iter_batched(
            || wide_tree(50, 10),
            |mut tree| black_box(tree.add_group(GroupParent::Rule, Some(&template))),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_add_remove_condition,
    bench_remove_group,
    bench_replace_root
);
criterion_main!(benches);
