use logweave_engine::{DisplayTree, TreeAssembler};
use serde_json::{Value, json};

fn dump(tree: &DisplayTree) -> String {
    tree.visible_rows()
        .into_iter()
        .map(|(depth, id)| {
            let node = tree.node(id);
            let marker = match (node.allow_expand, node.expanded) {
                (false, _) => "•",
                (true, true) => "▼",
                (true, false) => "▶",
            };
            format!("{}{} {}", "  ".repeat(depth), marker, node.label.text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn assemble(records: Vec<Value>) -> (DisplayTree, TreeAssembler) {
    let mut tree = DisplayTree::new("source");
    let mut assembler = TreeAssembler::new();
    for record in records {
        assembler.add(&mut tree, record);
    }
    (tree, assembler)
}

#[test]
fn test_failed_action_is_auto_expanded() {
    let (tree, assembler) = assemble(vec![
        json!({"task_uuid": "u1", "task_level": [1], "action_type": "demo:action", "action_status": "started", "timestamp": 1000.0}),
        json!({"task_uuid": "u1", "task_level": [1], "action_type": "demo:action", "action_status": "failed", "timestamp": 1000.5}),
    ]);

    insta::assert_snapshot!(dump(&tree), @r"
    ▼ source
      ▼ u1
        • demo:action/1 ⇒ failed 1970-01-01 00:16:40Z ⧖ 0.500s
    ");

    let task = assembler.node_for("u1").unwrap();
    let action = tree.children(task)[0];
    assert!(tree.node(action).expanded);
    assert!(tree.node(task).expanded);
    assert!(tree.node(tree.root()).expanded);
}

#[test]
fn test_deep_failure_is_visible_and_siblings_stay_collapsed() {
    let (mut tree, _) = assemble(vec![
        json!({"task_uuid": "u2", "task_level": [1], "action_type": "outer", "action_status": "started"}),
        json!({"task_uuid": "u2", "task_level": [2, 1], "action_type": "inner", "action_status": "started"}),
        json!({"task_uuid": "u2", "task_level": [2, 2, 1], "action_type": "deep", "action_status": "started"}),
        json!({"task_uuid": "u2", "task_level": [2, 2, 2], "action_type": "deep", "action_status": "failed", "reason": "boom"}),
        json!({"task_uuid": "u2", "task_level": [2, 3], "action_type": "inner", "action_status": "succeeded"}),
        json!({"task_uuid": "u2", "task_level": [3], "action_type": "outer", "action_status": "succeeded"}),
        json!({"task_uuid": "u3", "task_level": [1], "message_type": "login", "user": "alice"}),
    ]);

    insta::assert_snapshot!(dump(&tree), @r"
    ▼ source
      ▼ u2
        ▼ outer/1 ⇒ succeeded
          ▼ inner/2/1 ⇒ succeeded
            ▼ deep/2/2/1 ⇒ failed
              • reason: boom
      ▶ u3
    ");

    tree.expand_all();
    insta::assert_snapshot!(dump(&tree), @r"
    ▼ source
      ▼ u2
        ▼ outer/1 ⇒ succeeded
          ▼ inner/2/1 ⇒ succeeded
            ▼ deep/2/2/1 ⇒ failed
              • reason: boom
      ▼ u3
        ▼ login/1
          • user: alice
    ");
}

#[test]
fn test_embedded_details_expand() {
    let (mut tree, _) = assemble(vec![json!({
        "task_uuid": "u4",
        "task_level": [1],
        "message_type": "crash",
        "timestamp": 0.0,
        "error": "ValueError",
        "exc_details": r#"{"file": "app.py", "line": 3}"#
    })]);
    tree.expand_all();

    insta::assert_snapshot!(dump(&tree), @r#"
    ▼ source
      ▼ u4
        ▼ crash/1 1970-01-01 00:00:00Z
          • error: ValueError
          ▼ exc_details: {"file": "app.py", "line": 3}
            • file: app.py
            • line: 3
    "#);
}

#[test]
fn test_reserved_keys_are_not_fields() {
    let (tree, assembler) = assemble(vec![json!({
        "task_uuid": "u1",
        "task_level": [1],
        "action_type": "x",
        "action_status": "succeeded",
        "timestamp": 1.0,
        "foo": "bar"
    })]);

    let task = assembler.node_for("u1").unwrap();
    let action = tree.children(task)[0];
    let fields: Vec<&str> = tree
        .children(action)
        .iter()
        .map(|id| tree.node(*id).label.text())
        .collect();
    assert_eq!(fields, vec!["foo: bar"]);
}

#[test]
fn test_replayed_task_is_materialized_once() {
    let records = vec![
        json!({"task_uuid": "u1", "task_level": [1], "action_type": "a", "action_status": "started"}),
        json!({"task_uuid": "u1", "task_level": [2], "action_type": "a", "action_status": "succeeded"}),
    ];
    let mut tree = DisplayTree::new("source");
    let mut assembler = TreeAssembler::new();

    let mut created = Vec::new();
    for record in records.iter().cloned() {
        created.extend(assembler.add(&mut tree, record));
    }
    assert_eq!(created.len(), 1);
    let size = tree.len();

    for record in records {
        assert!(assembler.add(&mut tree, record).is_empty());
    }
    assert_eq!(tree.len(), size);
    assert_eq!(assembler.task_count(), 1);
    assert_eq!(tree.children(tree.root()).len(), 1);
}

#[test]
fn test_tree_only_grows() {
    let lines = [
        r#"{"task_uuid": "a", "task_level": [1], "message_type": "one", "n": 1}"#,
        "not json",
        r#"{"task_uuid": "b", "task_level": [1], "action_type": "two", "action_status": "started"}"#,
        r#"{"task_uuid": "b", "task_level": [2, 1], "message_type": "inside"}"#,
        r#"{"task_level": [1]}"#,
        r#"{"task_uuid": "b", "task_level": [3], "action_type": "two", "action_status": "succeeded"}"#,
        r#"{"task_uuid": "a", "task_level": [1], "message_type": "one", "n": 1}"#,
    ];
    let mut tree = DisplayTree::new("source");
    let mut assembler = TreeAssembler::new();

    let mut previous_len = tree.len();
    let mut previous_roots: Vec<String> = Vec::new();
    for line in lines {
        assembler.add_line(&mut tree, line);

        let roots: Vec<String> = tree
            .children(tree.root())
            .iter()
            .map(|id| tree.node(*id).label.text().to_string())
            .collect();
        assert!(tree.len() >= previous_len);
        assert!(roots.starts_with(&previous_roots));
        previous_len = tree.len();
        previous_roots = roots;
    }

    let roots: Vec<&str> = tree
        .children(tree.root())
        .iter()
        .map(|id| tree.node(*id).label.text())
        .collect();
    assert_eq!(roots, vec!["a", "b"]);
    assert_eq!(assembler.pending_tasks(), 0);
}
