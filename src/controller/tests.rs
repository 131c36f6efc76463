use super::*;
use crate::store::{MemoryStore, StoreError};
use crate::surface::MemorySurface;
use fake::faker::lorem::en::Word;
use fake::Fake;
use serde_json::{json, Value};

type TestController = Controller<MemorySurface, MemoryStore>;

const KEY: &str = "outline";

fn controller() -> TestController {
    Controller::new(MemorySurface::new(), MemoryStore::new(), KEY)
}

fn persisted(controller: &TestController) -> Option<Value> {
    controller.store().get(KEY).unwrap()
}

fn titles(nodes: &[TreeNode]) -> Vec<&str> {
    nodes.iter().map(TreeNode::title).collect()
}

/// Groceries(0) > [Dairy(1) > [Milk(2)], Bread(3)], Chores(4)
fn forest() -> Vec<TreeNode> {
    let mut groceries = TreeNode::with_created_at("Groceries", 0, None, None, 100).unwrap();
    let mut dairy = TreeNode::with_created_at("Dairy", 1, Some(0), Some(0), 101).unwrap();
    dairy
        .add(TreeNode::with_created_at("Milk", 2, Some(0), Some(1), 102).unwrap())
        .unwrap();
    groceries.add(dairy).unwrap();
    groceries
        .add(TreeNode::with_created_at("Bread", 3, Some(0), Some(0), 103).unwrap())
        .unwrap();
    let chores = TreeNode::with_created_at("Chores", 4, None, None, 104).unwrap();
    vec![groceries, chores]
}

fn ids_in_document_order(controller: &TestController) -> Vec<NodeId> {
    controller
        .handles()
        .iter()
        .map(|h| controller.surface().item(*h).unwrap().id)
        .collect()
}

#[test]
fn test_commit_root_then_child() {
    let mut c = controller();
    let root = c.new_root().unwrap();
    assert_eq!(root.id, 0);
    assert_eq!(
        c.state(),
        InteractionState::Add {
            parent_id: None,
            root_id: None
        }
    );
    assert!(c.commit_label(root, "Groceries").unwrap());
    assert_eq!(c.state(), InteractionState::Idle);
    assert_eq!(c.forest().len(), 1);
    assert_eq!(c.forest()[0].id(), 0);
    assert_eq!(c.forest()[0].title(), "Groceries");
    assert!(c.forest()[0].children().is_empty());

    let child = c.add_child(root.handle).unwrap();
    assert_eq!(child.id, 1);
    assert_eq!(child.parent_id, Some(0));
    assert_eq!(child.root_id, Some(0));
    assert!(c.commit_label(child, "Milk").unwrap());

    let children = c.forest()[0].children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id(), 1);
    assert_eq!(children[0].title(), "Milk");
    assert!(children[0].children().is_empty());
    assert_eq!(persisted(&c), Some(serde_json::to_value(c.forest()).unwrap()));
}

#[test]
fn test_remove_child_updates_model_surface_and_store() {
    let mut c = controller();
    let root = c.new_root().unwrap();
    c.commit_label(root, "Groceries").unwrap();
    let milk = c.add_child(root.handle).unwrap();
    c.commit_label(milk, "Milk").unwrap();
    c.settle();
    assert_eq!(c.handles().len(), 2);

    assert!(c.remove_node(milk.handle).unwrap());
    assert!(c.forest()[0].children().is_empty());
    assert!(c.surface().item(milk.handle).is_none());
    assert_eq!(c.handles(), &[root.handle]);

    let stored = persisted(&c).unwrap();
    assert_eq!(stored[0]["children"], json!([]));
}

#[test]
fn test_remove_root_unregisters_it() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let groceries = c.handles()[0];
    assert!(c.remove_node(groceries).unwrap());
    assert_eq!(titles(c.forest()), vec!["Chores"]);
    assert_eq!(ids_in_document_order(&c), vec![4]);
}

#[test]
fn test_remove_placeholder_only_touches_surface() {
    let mut c = controller();
    let root = c.new_root().unwrap();
    assert!(!c.remove_node(root.handle).unwrap());
    assert_eq!(c.state(), InteractionState::Idle);
    assert_eq!(c.pending(), None);
    assert!(c.handles().is_empty());
}

#[test]
fn test_removing_parent_drops_pending_add_under_it() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let dairy = c.handles()[1];
    c.add_child(dairy).unwrap();
    assert!(c.remove_node(dairy).unwrap());
    assert_eq!(c.state(), InteractionState::Idle);
    assert_eq!(c.pending(), None);
    assert_eq!(ids_in_document_order(&c), vec![0, 3, 4]);
}

#[test]
fn test_blank_label_is_ignored() {
    let mut c = controller();
    let root = c.new_root().unwrap();
    assert!(!c.commit_label(root, "   ").unwrap());
    assert!(c.forest().is_empty());
    assert!(matches!(c.state(), InteractionState::Add { .. }));
    assert_eq!(persisted(&c), None);
}

#[test]
fn test_label_is_trimmed() {
    let mut c = controller();
    let root = c.new_root().unwrap();
    c.commit_label(root, "  Groceries \n").unwrap();
    assert_eq!(c.forest()[0].title(), "Groceries");
    let attrs = c.surface().item(root.handle).unwrap();
    assert_eq!(attrs.value, "Groceries");
    assert!(attrs.read_only);
}

#[test]
fn test_stale_context_does_not_apply_twice() {
    let mut c = controller();
    let root = c.new_root().unwrap();
    c.commit_label(root, "Groceries").unwrap();
    assert!(!c.commit_label(root, "Errands").unwrap());
    assert_eq!(titles(c.forest()), vec!["Groceries"]);
}

#[test]
fn test_abandoned_placeholder_context_is_ignored() {
    let mut c = controller();
    let first = c.new_root().unwrap();
    let second = c.new_root().unwrap();
    assert!(!c.commit_label(first, "Stale").unwrap());
    assert!(c.forest().is_empty());
    assert_eq!(c.pending(), Some(second));

    assert!(c.commit_label(second, "Real").unwrap());
    assert_eq!(titles(c.forest()), vec!["Real"]);
    assert_eq!(c.forest()[0].id(), second.id);
}

#[test]
fn test_abandoned_rename_context_is_ignored() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let bread = c.handles()[3];
    let chores = c.handles()[4];
    let stale = c.begin_modify(bread).unwrap();
    let live = c.begin_modify(chores).unwrap();

    assert!(!c.commit_label(stale, "Rolls").unwrap());
    assert_eq!(c.schema().find(3, 0, None).unwrap().title(), "Bread");
    let attrs = c.surface().item(bread).unwrap();
    assert_eq!(attrs.value, "Bread");
    assert!(attrs.read_only);

    assert!(c.commit_label(live, "Errands").unwrap());
    assert_eq!(titles(c.forest()), vec!["Groceries", "Errands"]);
}

#[test]
fn test_modify_renames_node() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let milk = c.handles()[2];
    let context = c.begin_modify(milk).unwrap();
    assert_eq!(
        c.state(),
        InteractionState::Modify {
            target_id: 2,
            root_id: 0
        }
    );
    assert!(!c.surface().item(milk).unwrap().read_only);

    assert!(c.commit_label(context, "Oat milk").unwrap());
    assert_eq!(c.schema().find(2, 0, None).unwrap().title(), "Oat milk");
    assert_eq!(c.state(), InteractionState::Idle);
    let stored = persisted(&c).unwrap();
    assert_eq!(stored[0]["children"][0]["children"][0]["title"], "Oat milk");
}

#[test]
fn test_cancel_modify_restores_title() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let bread = c.handles()[3];
    c.begin_modify(bread).unwrap();
    c.surface.set_value(bread, "Bre");
    c.cancel_edit();
    let attrs = c.surface().item(bread).unwrap();
    assert_eq!(attrs.value, "Bread");
    assert!(attrs.read_only);
    assert_eq!(c.state(), InteractionState::Idle);
}

#[test]
fn test_cancel_add_discards_placeholder() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let chores = c.handles()[4];
    let context = c.add_child(chores).unwrap();
    c.cancel_edit();
    c.settle();
    assert!(c.surface().item(context.handle).is_none());
    assert_eq!(c.handles().len(), 5);
    assert!(c.forest()[1].children().is_empty());
}

#[test]
fn test_new_gesture_discards_uncommitted_placeholder() {
    let mut c = controller();
    let first = c.new_root().unwrap();
    let second = c.new_root().unwrap();
    assert!(c.surface().item(first.handle).is_none());
    assert_eq!(second.id, 1);
    c.commit_label(second, "Chores").unwrap();
    assert_eq!(c.forest()[0].id(), 1);
}

#[test]
fn test_gestures_need_committed_nodes() {
    let mut c = controller();
    let root = c.new_root().unwrap();
    assert!(matches!(
        c.add_child(root.handle),
        Err(AppError::NodeNotFound { id: 0, .. })
    ));
    assert!(matches!(
        c.begin_modify(Handle::new(999)),
        Err(AppError::Surface(SurfaceError::UnknownHandle(_)))
    ));
}

#[test]
fn test_create_placeholder_allocates_and_schedules_refresh() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    assert_eq!(c.next_id(), 5);

    let context = c.create_placeholder(Some(0), Some(0)).unwrap();
    assert_eq!(context.id, 5);
    assert_eq!(c.next_id(), 6);
    assert_eq!(c.surface().focused(), Some(context.handle));
    // The model only learns about the node on commit.
    assert!(c.schema().find(5, 0, None).is_none());

    assert_eq!(c.handles().len(), 5);
    c.settle();
    assert_eq!(c.handles().len(), 6);
    assert_eq!(ids_in_document_order(&c), vec![0, 1, 2, 3, 5, 4]);
}

#[test]
fn test_create_placeholder_under_unknown_parent_fails() {
    let mut c = controller();
    assert!(matches!(
        c.create_placeholder(Some(3), Some(3)),
        Err(AppError::NodeNotFound { id: 3, root_id: 3 })
    ));
    assert_eq!(c.next_id(), 0);
}

#[test]
fn test_refreshes_coalesce() {
    let mut c = controller();
    let a = c.new_root().unwrap();
    c.commit_label(a, "A").unwrap();
    let b = c.new_root().unwrap();
    c.commit_label(b, "B").unwrap();
    assert!(c.handles().is_empty());
    c.settle();
    assert_eq!(c.handles(), &[a.handle, b.handle]);
    c.settle();
    assert_eq!(c.handles().len(), 2);
}

#[test]
fn test_render_round_trips_forest() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    assert_eq!(c.forest(), forest().as_slice());
    assert_eq!(c.next_id(), 5);
    assert_eq!(ids_in_document_order(&c), vec![0, 1, 2, 3, 4]);
    assert_eq!(persisted(&c), Some(serde_json::to_value(forest()).unwrap()));

    // Re-rendering the current schema yields the same surface.
    c.render(None).unwrap();
    assert_eq!(ids_in_document_order(&c), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_render_empty_forest_resets_counter() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    c.render(Some(vec![])).unwrap();
    assert_eq!(c.next_id(), INITIAL_ID);
    assert!(c.handles().is_empty());
    assert_eq!(persisted(&c), Some(json!([])));
}

#[test]
fn test_navigate_wraps_around() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let handles = c.handles().to_vec();

    assert_eq!(c.navigate(Direction::Next), Some(handles[0]));
    for expected in &handles[1..] {
        assert_eq!(c.navigate(Direction::Next), Some(*expected));
    }
    assert_eq!(c.navigate(Direction::Next), Some(handles[0]));
    assert_eq!(c.navigate(Direction::Prev), Some(handles[4]));

    let selected: Vec<_> = handles
        .iter()
        .filter(|h| c.surface().item(**h).unwrap().selected)
        .collect();
    assert_eq!(selected, vec![&handles[4]]);
}

#[test]
fn test_navigate_prev_from_nothing_selects_last() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    assert_eq!(c.navigate(Direction::Prev), Some(c.handles()[4]));
}

#[test]
fn test_navigate_needs_two_items() {
    let mut c = controller();
    let root = c.new_root().unwrap();
    c.commit_label(root, "Only").unwrap();
    c.settle();
    assert_eq!(c.navigate(Direction::Next), None);
    assert_eq!(c.selected(), None);
}

#[test]
fn test_removing_selected_item_clamps_selection() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    c.navigate(Direction::Prev);
    let chores = c.selected().unwrap();
    c.remove_node(chores).unwrap();
    let bread = c.handles()[3];
    assert_eq!(c.selected(), Some(bread));
    assert!(c.surface().item(bread).unwrap().selected);
}

#[test]
fn test_toggle_fold_is_presentation_only() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let groceries = c.handles()[0];
    assert_eq!(c.toggle_fold(groceries), Some(true));
    assert_eq!(c.surface().visible_items().len(), 2);
    assert_eq!(c.forest(), forest().as_slice());
    assert_eq!(c.toggle_fold(groceries), Some(false));

    let chores = c.handles()[4];
    assert_eq!(c.toggle_fold(chores), None);
}

#[test]
fn test_commit_moves_selection_forward() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let groceries = c.navigate(Direction::Next).unwrap();
    let context = c.begin_modify(groceries).unwrap();
    assert!(c.commit_label(context, "Shopping").unwrap());
    assert_eq!(c.selected(), Some(groceries));

    c.settle();
    let dairy = c.handles()[1];
    assert_eq!(c.selected(), Some(dairy));
    assert!(!c.surface().item(groceries).unwrap().selected);
    assert!(c.surface().item(dairy).unwrap().selected);

    // Only one step per commit.
    c.settle();
    assert_eq!(c.selected(), Some(dairy));
}

#[test]
fn test_folded_items_leave_navigation() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let groceries = c.handles()[0];
    let milk = c.handles()[2];
    let chores = c.handles()[4];
    for _ in 0..3 {
        c.navigate(Direction::Next);
    }
    assert_eq!(c.selected(), Some(milk));

    assert_eq!(c.toggle_fold(groceries), Some(true));
    assert_eq!(c.handles(), &[groceries, chores]);
    assert_eq!(c.selected(), Some(groceries));
    assert!(!c.surface().item(milk).unwrap().selected);
    assert_eq!(c.navigate(Direction::Next), Some(chores));

    assert_eq!(c.toggle_fold(groceries), Some(false));
    assert_eq!(c.handles().len(), 5);
    assert_eq!(c.selected(), Some(chores));
}

#[test]
fn test_placeholder_unfolds_its_parent() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let groceries = c.handles()[0];
    c.toggle_fold(groceries);
    assert_eq!(c.handles().len(), 2);

    let context = c.add_child(groceries).unwrap();
    c.settle();
    assert_eq!(c.handles().len(), 6);
    assert!(c.handles().contains(&context.handle));
}

#[test]
fn test_dispatch_navigation_and_rename() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    assert_eq!(
        c.dispatch_key(KeyAlias::Down.code()).unwrap(),
        Some(KeyAction::NavigateNext)
    );
    c.release_key(KeyAlias::Down.code());
    assert_eq!(c.selected(), Some(c.handles()[0]));

    assert_eq!(
        c.dispatch_key(KeyAlias::Space.code()).unwrap(),
        Some(KeyAction::Rename)
    );
    c.release_key(KeyAlias::Space.code());
    assert!(c.commit_pending("Shopping").unwrap());
    assert_eq!(c.forest()[0].title(), "Shopping");
}

#[test]
fn test_dispatch_delete_removes_selected() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    c.dispatch_key(KeyAlias::Up.code()).unwrap();
    c.release_key(KeyAlias::Up.code());
    assert_eq!(
        c.dispatch_key(KeyAlias::Delete.code()).unwrap(),
        Some(KeyAction::Remove)
    );
    assert_eq!(titles(c.forest()), vec!["Groceries"]);
}

#[test]
fn test_dispatch_without_selection_does_nothing() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    assert_eq!(c.dispatch_key(KeyAlias::Delete.code()).unwrap(), None);
    assert_eq!(c.forest().len(), 2);
}

#[test]
fn test_dispatch_tab_adds_child_to_selected() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    c.dispatch_key(KeyAlias::Up.code()).unwrap();
    c.release_key(KeyAlias::Up.code());
    assert_eq!(
        c.dispatch_key(KeyAlias::Tab.code()).unwrap(),
        Some(KeyAction::AddChild)
    );
    let title: String = Word().fake();
    assert!(c.commit_pending(&title).unwrap());
    assert_eq!(c.forest()[1].children()[0].title(), title);
    assert_eq!(c.forest()[1].children()[0].root_id(), 4);
}

#[test]
fn test_ctrl_r_chord_needs_held_ctrl() {
    let mut c = controller();
    let ctrl = KeyAlias::Ctrl.code();
    let r = KeyAlias::R.code();

    assert_eq!(c.dispatch_key(r).unwrap(), None);
    c.release_key(r);

    assert_eq!(c.dispatch_key(ctrl).unwrap(), None);
    assert_eq!(c.dispatch_key(r).unwrap(), Some(KeyAction::NewRoot));
    assert!(c.pending().is_some());
    c.release_key(r);
    c.release_key(ctrl);
    c.cancel_edit();

    // Ctrl was released, so a lone r must not fire again.
    assert_eq!(c.dispatch_key(r).unwrap(), None);
    assert_eq!(c.pending(), None);
}

#[test]
fn test_held_key_does_not_repeat() {
    let mut c = controller();
    c.render(Some(forest())).unwrap();
    let down = KeyAlias::Down.code();
    assert!(c.dispatch_key(down).unwrap().is_some());
    assert!(c.dispatch_key(down).unwrap().is_none());
    c.release_key(down);
    assert!(c.dispatch_key(down).unwrap().is_some());
    assert_eq!(c.selected(), Some(c.handles()[1]));
}

#[test]
fn test_restore_loads_saved_forest() {
    let mut store = MemoryStore::new();
    store
        .set(KEY, serde_json::to_value(forest()).unwrap())
        .unwrap();
    let mut c = Controller::new(MemorySurface::new(), store, KEY);
    c.restore().unwrap();
    assert_eq!(c.forest(), forest().as_slice());
    assert_eq!(c.next_id(), 5);
    assert_eq!(c.handles().len(), 5);
}

#[test]
fn test_restore_with_empty_store_renders_nothing() {
    let mut c = controller();
    c.restore().unwrap();
    assert!(c.forest().is_empty());
    assert_eq!(c.next_id(), 0);
}

#[test]
fn test_restore_rejects_invalid_forest() {
    let mut store = MemoryStore::new();
    store
        .set(
            KEY,
            json!([{
                "id": 0, "title": "", "created_at": 1, "parentId": null, "rootId": 0, "children": []
            }]),
        )
        .unwrap();
    let mut c = Controller::new(MemorySurface::new(), store, KEY);
    assert!(matches!(
        c.restore(),
        Err(AppError::Validation(ValidationError::EmptyTitle))
    ));

    let mut store = MemoryStore::new();
    store.set(KEY, json!({"not": "a forest"})).unwrap();
    let mut c = Controller::new(MemorySurface::new(), store, KEY);
    assert!(matches!(c.restore(), Err(AppError::Json(_))));
}

#[test]
fn test_restore_rejects_repeated_ids() {
    let mut store = MemoryStore::new();
    store
        .set(
            KEY,
            json!([
                {"id": 0, "title": "A", "created_at": 1, "parentId": null, "rootId": 0, "children": []},
                {"id": 0, "title": "B", "created_at": 2, "parentId": null, "rootId": 0, "children": []}
            ]),
        )
        .unwrap();
    let mut c = Controller::new(MemorySurface::new(), store, KEY);
    assert!(matches!(
        c.restore(),
        Err(AppError::Validation(ValidationError::DuplicateId(0)))
    ));
    assert!(c.forest().is_empty());
    assert!(c.handles().is_empty());
}

#[test]
fn test_restore_rejects_last_id() {
    let mut store = MemoryStore::new();
    store
        .set(
            KEY,
            json!([{
                "id": NodeId::MAX, "title": "Last", "created_at": 1,
                "parentId": null, "rootId": NodeId::MAX, "children": []
            }]),
        )
        .unwrap();
    let mut c = Controller::new(MemorySurface::new(), store, KEY);
    assert!(matches!(
        c.restore(),
        Err(AppError::Validation(ValidationError::IdsExhausted(id))) if id == NodeId::MAX
    ));
    assert!(c.forest().is_empty());
}

#[test]
fn test_placeholder_needs_a_free_id() {
    let mut c = controller();
    let last = TreeNode::new("Almost", NodeId::MAX - 1, None, None).unwrap();
    c.render(Some(vec![last])).unwrap();
    assert_eq!(c.next_id(), NodeId::MAX);

    assert!(matches!(
        c.new_root(),
        Err(AppError::Validation(ValidationError::IdsExhausted(id))) if id == NodeId::MAX
    ));
    assert_eq!(c.state(), InteractionState::Idle);
    assert_eq!(c.pending(), None);
    c.settle();
    assert_eq!(c.handles().len(), 1);
}

/// Store whose writes always fail.
struct BrokenStore;

impl PersistenceStore for BrokenStore {
    fn set(&mut self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Serialization("disk full".to_string()))
    }

    fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }
}

#[test]
fn test_failed_persistence_is_not_observed() {
    let mut c = Controller::new(MemorySurface::new(), BrokenStore, KEY);
    let root = c.new_root().unwrap();
    assert!(c.commit_label(root, "Groceries").unwrap());
    assert_eq!(titles(c.forest()), vec!["Groceries"]);
}

#[test]
fn test_controllers_do_not_share_state() {
    let mut first = controller();
    let mut second = controller();
    let a = first.new_root().unwrap();
    first.commit_label(a, "A").unwrap();
    let b = second.new_root().unwrap();
    assert_eq!(b.id, 0);
    assert!(second.forest().is_empty());
    assert_eq!(first.next_id(), 1);
}
