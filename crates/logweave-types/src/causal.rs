//! Causal log records: tasks made of nested actions and messages.
//!
//! Every record carries a `task_uuid` naming its root task and a `task_level`
//! locating it inside that task's tree. Action records additionally carry
//! `action_type` and `action_status`; leaf messages carry `message_type`.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fmt;

pub const TASK_UUID: &str = "task_uuid";
pub const TASK_LEVEL: &str = "task_level";
pub const ACTION_TYPE: &str = "action_type";
pub const ACTION_STATUS: &str = "action_status";
pub const MESSAGE_TYPE: &str = "message_type";
pub const TIMESTAMP: &str = "timestamp";

/// Keys that describe a record's position and kind rather than its payload.
pub const RESERVED_KEYS: [&str; 6] = [
    TASK_UUID,
    TASK_LEVEL,
    ACTION_TYPE,
    ACTION_STATUS,
    MESSAGE_TYPE,
    TIMESTAMP,
];

pub const STATUS_STARTED: &str = "started";
pub const STATUS_SUCCEEDED: &str = "succeeded";
pub const STATUS_FAILED: &str = "failed";

/// Deepest task level accepted from input.
pub const MAX_TASK_LEVEL_DEPTH: usize = 256;

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// True when `map` has the three keys that identify an action record.
pub fn has_causal_keys(map: &Map<String, Value>) -> bool {
    [TASK_UUID, TASK_LEVEL, ACTION_TYPE]
        .iter()
        .all(|key| map.contains_key(*key))
}

/// Position of a record within its task, e.g. `[1, 3, 2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskLevel(Vec<u32>);

impl TaskLevel {
    pub fn new(level: Vec<u32>) -> Result<Self> {
        if level.is_empty() {
            return Err(Error::MalformedRecord("task_level is empty".to_string()));
        }
        if level.len() > MAX_TASK_LEVEL_DEPTH {
            return Err(Error::MalformedRecord(format!(
                "task_level deeper than {} entries",
                MAX_TASK_LEVEL_DEPTH
            )));
        }
        if level.contains(&0) {
            return Err(Error::MalformedRecord(
                "task_level entries must be positive".to_string(),
            ));
        }
        Ok(Self(level))
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| Error::MalformedRecord("task_level is not an array".to_string()))?;

        let level = items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| {
                        Error::MalformedRecord(format!("invalid task_level entry: {}", item))
                    })
            })
            .collect::<Result<Vec<u32>>>()?;

        Self::new(level)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Level of the action this record belongs to (all but the last entry).
    pub fn parent(&self) -> &[u32] {
        &self.0[..self.0.len() - 1]
    }

    /// The first record of a task lives at `[1]`.
    pub fn is_root(&self) -> bool {
        self.0 == [1]
    }
}

impl fmt::Display for TaskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}

/// How a record participates in its task's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    ActionStart,
    ActionEnd,
    Plain,
}

/// A single decoded causal record.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub task_uuid: String,
    pub task_level: TaskLevel,
    pub timestamp: Option<f64>,
    /// Full record, including reserved keys, in original field order
    pub contents: Map<String, Value>,
}

impl Message {
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(contents) = value else {
            return Err(Error::MalformedRecord("record is not a JSON object".to_string()));
        };

        let task_uuid = contents
            .get(TASK_UUID)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MalformedRecord("missing string task_uuid".to_string()))?
            .to_string();

        let task_level = contents
            .get(TASK_LEVEL)
            .ok_or_else(|| Error::MalformedRecord("missing task_level".to_string()))
            .and_then(TaskLevel::from_value)?;

        match (contents.get(ACTION_TYPE), contents.get(MESSAGE_TYPE)) {
            (Some(Value::String(_)), _) => {
                if !matches!(contents.get(ACTION_STATUS), Some(Value::String(_))) {
                    return Err(Error::MalformedRecord(
                        "action record without string action_status".to_string(),
                    ));
                }
            }
            (Some(_), _) => {
                return Err(Error::MalformedRecord(
                    "action_type is not a string".to_string(),
                ));
            }
            (None, Some(Value::String(_))) => {}
            (None, Some(_)) => {
                return Err(Error::MalformedRecord(
                    "message_type is not a string".to_string(),
                ));
            }
            (None, None) => {
                return Err(Error::MalformedRecord(
                    "record has neither action_type nor message_type".to_string(),
                ));
            }
        }

        let timestamp = contents.get(TIMESTAMP).and_then(Value::as_f64);

        Ok(Self {
            task_uuid,
            task_level,
            timestamp,
            contents,
        })
    }

    pub fn from_json_line(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line.trim())?;
        Self::from_value(value)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.contents.get(key).and_then(Value::as_str)
    }

    pub fn action_type(&self) -> Option<&str> {
        self.str_field(ACTION_TYPE)
    }

    pub fn action_status(&self) -> Option<&str> {
        self.str_field(ACTION_STATUS)
    }

    pub fn message_type(&self) -> Option<&str> {
        self.str_field(MESSAGE_TYPE)
    }

    pub fn kind(&self) -> MessageKind {
        match (self.action_type(), self.action_status()) {
            (Some(_), Some(STATUS_STARTED)) => MessageKind::ActionStart,
            (Some(_), Some(_)) => MessageKind::ActionEnd,
            _ => MessageKind::Plain,
        }
    }

    /// Payload entries, i.e. everything except reserved keys.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.contents
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
    }
}

/// An unpaired record: a leaf event in the task tree.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenMessage {
    pub message: Message,
}

impl WrittenMessage {
    pub fn new(message: Message) -> Self {
        Self { message }
    }

    /// `message_type`, falling back to `action_type` for action-less records
    pub fn message_type(&self) -> Option<&str> {
        self.message
            .message_type()
            .or_else(|| self.message.action_type())
    }

    pub fn task_level(&self) -> &TaskLevel {
        &self.message.task_level
    }

    pub fn timestamp(&self) -> Option<f64> {
        self.message.timestamp
    }
}

/// A start/end record pair with the nodes logged in between.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenAction {
    pub start_message: Message,
    pub end_message: Option<Message>,
    pub children: Vec<TaskNode>,
}

impl WrittenAction {
    pub fn action_type(&self) -> Option<&str> {
        self.start_message.action_type()
    }

    pub fn task_level(&self) -> &TaskLevel {
        &self.start_message.task_level
    }

    /// `started` until an end record arrives, then the end record's status.
    pub fn status(&self) -> &str {
        self.end_message
            .as_ref()
            .and_then(Message::action_status)
            .unwrap_or(STATUS_STARTED)
    }

    pub fn is_failed(&self) -> bool {
        self.end_message
            .as_ref()
            .and_then(Message::action_status)
            .is_some_and(|status| status == STATUS_FAILED)
    }

    /// Seconds between start and end, when both carry timestamps.
    pub fn duration(&self) -> Option<f64> {
        let end = self.end_message.as_ref()?.timestamp?;
        Some(end - self.start_message.timestamp?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskNode {
    Action(WrittenAction),
    Message(WrittenMessage),
}

/// A completed root task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub task_uuid: String,
    pub root: TaskNode,
}
