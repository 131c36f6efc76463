//! Benchmarks for schema lookups and rebuilding the schema from a forest.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use outliner::schema::SchemaStore;
use outliner::tree::{NodeId, TreeNode};

const ROOTS: NodeId = 10;
const CHILDREN: NodeId = 10;
const GRANDCHILDREN: NodeId = 10;

/// Build a forest of three levels, ids allocated depth first.
///
fn forest() -> Vec<TreeNode> {
    let mut next: NodeId = 0;
    let mut roots = vec![];
    for r in 0..ROOTS {
        let root_id = next;
        next += 1;
        let mut root = TreeNode::with_created_at(format!("root {}", r), root_id, None, None, 0)
            .unwrap();
        for c in 0..CHILDREN {
            let child_id = next;
            next += 1;
            let mut child =
                TreeNode::with_created_at(format!("child {}", c), child_id, Some(root_id), Some(root_id), 0)
                    .unwrap();
            for g in 0..GRANDCHILDREN {
                let leaf = TreeNode::with_created_at(
                    format!("leaf {}", g),
                    next,
                    Some(root_id),
                    Some(child_id),
                    0,
                )
                .unwrap();
                next += 1;
                child.add(leaf).unwrap();
            }
            root.add(child).unwrap();
        }
        roots.push(root);
    }
    roots
}

fn bench_rebuild_from_forest(c: &mut Criterion) {
    let nodes = forest();
    c.bench_function("rebuild_from_forest_1110", |b| {
        b.iter(|| {
            let mut schema = SchemaStore::new();
            schema.rebuild_from_forest(black_box(nodes.clone())).unwrap()
        })
    });
}

fn bench_find(c: &mut Criterion) {
    let mut schema = SchemaStore::new();
    let next = schema.rebuild_from_forest(forest()).unwrap();
    let last_root = next - 1 - CHILDREN * (GRANDCHILDREN + 1);
    c.bench_function("find_last_leaf", |b| {
        b.iter(|| schema.find(black_box(next - 1), black_box(last_root), None))
    });
    c.bench_function("find_with_parent_hint", |b| {
        b.iter(|| schema.find(black_box(next), black_box(last_root), Some(black_box(last_root + 1))))
    });
}

criterion_group!(benches, bench_rebuild_from_forest, bench_find);
criterion_main!(benches);
