//! Mention extraction from rich-text message bodies.
//!
//! A message body is a list of block nodes. Nodes may carry `children`;
//! a node with `"type": "user"` references a user through its `ref` field.

use crate::types::UserId;
use serde_json::Value;

const USER_NODE_TYPE: &str = "user";

/// Collect the user ids referenced in `blocks`, in document order, without
/// duplicates.
pub fn get_mentions(blocks: &[Value]) -> Vec<UserId> {
    let mut mentions = Vec::new();
    for block in blocks {
        collect(block, &mut mentions);
    }
    mentions
}

/// Whether `blocks` mention `user`.
pub fn mentions_user(blocks: &[Value], user: &UserId) -> bool {
    get_mentions(blocks).iter().any(|id| id == user)
}

fn collect(node: &Value, out: &mut Vec<UserId>) {
    let Value::Object(fields) = node else {
        return;
    };

    if fields.get("type").and_then(Value::as_str) == Some(USER_NODE_TYPE) {
        if let Some(reference) = fields.get("ref").and_then(Value::as_str) {
            let id = UserId::from(reference);
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }

    if let Some(Value::Array(children)) = fields.get("children") {
        for child in children {
            collect(child, out);
        }
    }
}
