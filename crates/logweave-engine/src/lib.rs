//! Causal task reconstruction and rendering.
//!
//! Records flow `Message` → [`Parser`] → completed [`Task`](logweave_types::Task)
//! → [`TreeRenderer`] → [`DisplayTree`] nodes. [`TreeAssembler`] ties these
//! together and makes sure each task is rendered once.

pub mod assembler;
pub mod fields;
pub mod parser;
pub mod render;
pub mod tree;

pub use assembler::TreeAssembler;
pub use fields::{FieldChildren, MAX_FIELD_DEPTH};
pub use parser::Parser;
pub use render::{CausalNode, TreeRenderer, format_timestamp};
pub use tree::{DisplayNode, DisplayTree, NodeId};

use logweave_types::has_causal_keys;
use serde_json::Value;

/// True when `line` is a JSON object carrying `task_uuid`, `task_level` and
/// `action_type`. Used to pick the tree view for a source.
pub fn is_causal_record(line: &str) -> bool {
    match serde_json::from_str::<Value>(line.trim()) {
        Ok(Value::Object(map)) => has_causal_keys(&map),
        _ => false,
    }
}
