//! Maps causal task nodes onto [`DisplayTree`] nodes.

use crate::fields::{FieldChildren, is_container};
use crate::tree::{DisplayTree, NodeId};
use chrono::DateTime;
use logweave_types::{
    Color, Message, STATUS_FAILED, STATUS_STARTED, STATUS_SUCCEEDED, Style, StyledText, Task,
    TaskLevel, TaskNode, WrittenAction, WrittenMessage,
};
use serde_json::Value;

/// Field keys whose values are highlighted as problems.
pub const ALERT_KEYS: [&str; 4] = ["exception", "reason", "error", "failure"];

const NAME_STYLE: Style = Style::new().fg(Color::Cyan);
const PUNCT_STYLE: Style = Style::new().fg(Color::BrightBlack);
const TIME_STYLE: Style = Style::new().fg(Color::Blue);
const VALUE_STYLE: Style = Style::new().fg(Color::White);
const ALERT_STYLE: Style = Style::new().fg(Color::BrightRed);

/// Borrowed view of anything that can appear in a causal tree.
#[derive(Debug, Clone)]
pub enum CausalNode<'a> {
    RootTask(&'a Task),
    Action(&'a WrittenAction),
    Message(&'a WrittenMessage),
    Field {
        key: String,
        value: Value,
        depth: usize,
    },
}

impl<'a> CausalNode<'a> {
    pub fn from_task_node(node: &'a TaskNode) -> Self {
        match node {
            TaskNode::Action(action) => Self::Action(action),
            TaskNode::Message(message) => Self::Message(message),
        }
    }

    pub fn field(key: impl Into<String>, value: Value) -> Self {
        Self::Field {
            key: key.into(),
            value,
            depth: 0,
        }
    }

    pub fn label(&self) -> StyledText {
        match self {
            Self::RootTask(task) => StyledText::new(task.task_uuid.as_str()),
            Self::Action(action) => action_label(action),
            Self::Message(message) => message_label(message),
            Self::Field { key, value, .. } => field_label(key, value),
        }
    }

    /// Children in display order.
    pub fn children(&self) -> Vec<CausalNode<'a>> {
        match self {
            Self::RootTask(task) => {
                let task: &'a Task = task;
                vec![Self::from_task_node(&task.root)]
            }
            Self::Action(action) => {
                let action: &'a WrittenAction = action;
                let mut children = fields_of(&action.start_message);
                children.extend(action.children.iter().map(Self::from_task_node));
                if let Some(end) = distinct_end(action) {
                    children.extend(fields_of(end));
                }
                children
            }
            Self::Message(message) => fields_of(&message.message),
            Self::Field { key, value, depth } => FieldChildren::new(key, value, *depth)
                .map(|(key, value)| Self::Field {
                    key,
                    value,
                    depth: depth + 1,
                })
                .collect(),
        }
    }

    /// Whether this kind of node may be expanded, before looking at children.
    pub fn is_structural(&self) -> bool {
        match self {
            Self::RootTask(_) | Self::Action(_) | Self::Message(_) => true,
            Self::Field { key, value, .. } => is_container(key, value),
        }
    }

    pub fn is_failed_action(&self) -> bool {
        matches!(self, Self::Action(action) if action.is_failed())
    }
}

/// The end record, unless it is also standing in as the start record.
fn distinct_end(action: &WrittenAction) -> Option<&Message> {
    action
        .end_message
        .as_ref()
        .filter(|end| **end != action.start_message)
}

fn fields_of<'a>(message: &Message) -> Vec<CausalNode<'a>> {
    message
        .fields()
        .map(|(key, value)| CausalNode::field(key.as_str(), value.clone()))
        .collect()
}

/// `1970-01-01 00:16:40Z` for 1000.0 seconds.
pub fn format_timestamp(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    let datetime = DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))?;
    Some(datetime.format("%Y-%m-%d %H:%M:%SZ").to_string())
}

pub fn status_style(status: &str) -> Style {
    match status {
        STATUS_SUCCEEDED => Style::new().fg(Color::Green),
        STATUS_FAILED => Style::new().fg(Color::Red),
        STATUS_STARTED => Style::new().fg(Color::Yellow),
        _ => Style::new(),
    }
}

fn append_name(label: &mut StyledText, name: Option<&str>, level: &TaskLevel) {
    label.append(
        &format!("{}/{}", name.unwrap_or("<unnamed>"), level),
        NAME_STYLE,
    );
}

fn append_timestamp(label: &mut StyledText, timestamp: Option<f64>) {
    if let Some(formatted) = timestamp.and_then(format_timestamp) {
        label.append(&format!(" {}", formatted), TIME_STYLE);
    }
}

fn action_label(action: &WrittenAction) -> StyledText {
    let mut label = StyledText::default();
    append_name(&mut label, action.action_type(), action.task_level());

    let status = action.status();
    label.append(" ⇒ ", PUNCT_STYLE);
    label.append(status, status_style(status));

    append_timestamp(&mut label, action.start_message.timestamp);
    if distinct_end(action).is_some() {
        if let Some(duration) = action.duration() {
            label.append(&format!(" ⧖ {:.3}s", duration), TIME_STYLE);
        }
    }
    label
}

fn message_label(message: &WrittenMessage) -> StyledText {
    let mut label = StyledText::default();
    append_name(&mut label, message.message_type(), message.task_level());
    append_timestamp(&mut label, message.timestamp());
    label
}

fn field_label(key: &str, value: &Value) -> StyledText {
    let mut label = StyledText::default();
    label.append(&format!("{}: ", key), PUNCT_STYLE);

    let style = if ALERT_KEYS.contains(&key) {
        ALERT_STYLE
    } else {
        VALUE_STYLE
    };
    match value {
        Value::String(text) => label.append(text, style),
        other => label.append(&other.to_string(), style),
    }
    label
}

/// Builds display nodes for causal tasks.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeRenderer;

impl TreeRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Add `node` and its whole subtree under `parent`. Failed actions are
    /// expanded together with every ancestor.
    pub fn materialize(&self, tree: &mut DisplayTree, parent: NodeId, node: CausalNode<'_>) -> NodeId {
        let id = tree.add(parent, node.label());
        let children = node.children();

        tree.set_allow_expand(id, node.is_structural() && !children.is_empty());
        if node.is_failed_action() {
            tree.expand_path(id);
        }

        for child in children {
            self.materialize(tree, id, child);
        }
        id
    }

    /// Materialize a completed task directly under the tree root.
    pub fn materialize_task(&self, tree: &mut DisplayTree, task: &Task) -> NodeId {
        let root = tree.root();
        self.materialize(tree, root, CausalNode::RootTask(task))
    }
}
