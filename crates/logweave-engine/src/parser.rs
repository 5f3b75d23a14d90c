//! Stitches causal records into completed tasks.
//!
//! Records for a task may arrive interleaved with other tasks. They are
//! buffered per `task_uuid` until the task's root completes, then assembled
//! into a tree in one pass.

use logweave_types::{Message, MessageKind, Task, TaskNode, WrittenAction, WrittenMessage};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Parser state. Threaded by value: every [`Parser::add`] consumes the state
/// and returns the next one alongside any tasks completed by the record.
#[derive(Debug, Default, Clone)]
pub struct Parser {
    pending: HashMap<String, Vec<Message>>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, message: Message) -> (Vec<Task>, Parser) {
        let completes = completes_task(&message);
        let task_uuid = message.task_uuid.clone();
        self.pending
            .entry(task_uuid.clone())
            .or_default()
            .push(message);

        if !completes {
            return (Vec::new(), self);
        }

        let tasks = self
            .pending
            .remove(&task_uuid)
            .and_then(|messages| build_task(task_uuid, messages))
            .into_iter()
            .collect();
        (tasks, self)
    }

    /// Number of tasks still waiting for their root to complete.
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }
}

/// A task is complete when its root action ends, or when it is a lone
/// message at the root level.
fn completes_task(message: &Message) -> bool {
    match message.kind() {
        MessageKind::ActionEnd => message.task_level.len() == 1,
        MessageKind::Plain => message.task_level.is_root(),
        MessageKind::ActionStart => false,
    }
}

enum ChildSlot {
    Action(Vec<u32>),
    Message(Message),
}

#[derive(Default)]
struct ActionBuilder {
    start: Option<Message>,
    end: Option<Message>,
    children: Vec<ChildSlot>,
}

/// Action builders keyed by action level (the record level minus its last entry).
type Actions = HashMap<Vec<u32>, ActionBuilder>;

fn build_task(task_uuid: String, messages: Vec<Message>) -> Option<Task> {
    let mut actions = Actions::new();

    for message in messages {
        let prefix = message.task_level.parent().to_vec();
        ensure_action(&mut actions, &prefix);
        let Some(builder) = actions.get_mut(&prefix) else {
            continue;
        };

        match message.kind() {
            MessageKind::ActionStart if builder.start.is_none() => builder.start = Some(message),
            MessageKind::ActionEnd if builder.end.is_none() => builder.end = Some(message),
            MessageKind::ActionStart | MessageKind::ActionEnd => {
                debug!(task_uuid = %task_uuid, level = %message.task_level, "duplicate action boundary ignored");
            }
            MessageKind::Plain => builder.children.push(ChildSlot::Message(message)),
        }
    }

    match finish(&mut actions, &[]) {
        Some(root) => Some(Task { task_uuid, root }),
        None => {
            warn!(task_uuid = %task_uuid, "task has no usable root; dropped");
            None
        }
    }
}

/// Create the builder for `prefix` and register it with its parent, creating
/// missing ancestors on the way up.
fn ensure_action(actions: &mut Actions, prefix: &[u32]) {
    if actions.contains_key(prefix) {
        return;
    }
    actions.insert(prefix.to_vec(), ActionBuilder::default());

    if let Some((_, parent)) = prefix.split_last() {
        ensure_action(actions, parent);
        if let Some(parent_builder) = actions.get_mut(parent) {
            parent_builder
                .children
                .push(ChildSlot::Action(prefix.to_vec()));
        }
    }
}

fn finish(actions: &mut Actions, prefix: &[u32]) -> Option<TaskNode> {
    let builder = actions.remove(prefix)?;

    let mut children: Vec<TaskNode> = builder
        .children
        .into_iter()
        .filter_map(|slot| match slot {
            ChildSlot::Action(child_prefix) => finish(actions, &child_prefix),
            ChildSlot::Message(message) => Some(TaskNode::Message(WrittenMessage::new(message))),
        })
        .collect();

    let start = match (builder.start, &builder.end) {
        (Some(start), _) => start,
        (None, Some(end)) => {
            debug!(level = ?prefix, "action without start record; using end record");
            end.clone()
        }
        // No boundaries at all: a lone root message, or a gap in the log.
        (None, None) if children.len() == 1 => return children.pop(),
        (None, None) => {
            warn!(level = ?prefix, children = children.len(), "action without start or end record; dropped");
            return None;
        }
    };

    Some(TaskNode::Action(WrittenAction {
        start_message: start,
        end_message: builder.end,
        children,
    }))
}
