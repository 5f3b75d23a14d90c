use crate::parser::Parser;
use crate::render::TreeRenderer;
use crate::tree::{DisplayTree, NodeId};
use logweave_types::{Message, Result};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Feeds causal records through the parser and materializes each completed
/// task exactly once.
#[derive(Debug, Default)]
pub struct TreeAssembler {
    parser: Parser,
    renderer: TreeRenderer,
    /// Materialized root-task node per task UUID
    nodes: HashMap<String, NodeId>,
}

impl TreeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one decoded record. Returns the root-task nodes created by it.
    /// Malformed records are logged and dropped.
    pub fn add(&mut self, tree: &mut DisplayTree, record: Value) -> Vec<NodeId> {
        self.add_decoded(tree, Message::from_value(record))
    }

    /// Decode `line` as JSON and [`add`](Self::add) it. Blank lines are ignored.
    pub fn add_line(&mut self, tree: &mut DisplayTree, line: &str) -> Vec<NodeId> {
        if line.trim().is_empty() {
            return Vec::new();
        }
        self.add_decoded(tree, Message::from_json_line(line))
    }

    fn add_decoded(&mut self, tree: &mut DisplayTree, decoded: Result<Message>) -> Vec<NodeId> {
        let message = match decoded {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "dropping causal record");
                return Vec::new();
            }
        };

        let (tasks, parser) = std::mem::take(&mut self.parser).add(message);
        self.parser = parser;

        let mut created = Vec::new();
        for task in tasks {
            if self.nodes.contains_key(&task.task_uuid) {
                debug!(task_uuid = %task.task_uuid, "task already materialized");
                continue;
            }
            let id = self.renderer.materialize_task(tree, &task);
            self.nodes.insert(task.task_uuid, id);
            created.push(id);
        }
        created
    }

    pub fn node_for(&self, task_uuid: &str) -> Option<NodeId> {
        self.nodes.get(task_uuid).copied()
    }

    /// Number of distinct tasks materialized so far.
    pub fn task_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of tasks still waiting for their root to complete.
    pub fn pending_tasks(&self) -> usize {
        self.parser.pending_tasks()
    }
}
