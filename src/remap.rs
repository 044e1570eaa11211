//! Rewriting ticket references from a mapping file.
//!
//! The mapping is a JSON object of old reference to new reference, e.g.
//! `{"BBGQ-1": "KARA-TE"}`. References not in the mapping are left alone.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{BadgeError, Result};
use crate::ticket::Ticket;

/// One reference that was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub from: String,
    pub to: String,
}

pub fn parse_mapping(contents: &str) -> Result<HashMap<String, String>> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    let object = match value {
        serde_json::Value::Object(object) => object,
        other => {
            return Err(BadgeError::InvalidMapping(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    object
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(new_ref) => Ok((key, new_ref)),
            other => Err(BadgeError::InvalidMapping(format!(
                "value for {} must be a string, got {}",
                key,
                json_kind(&other)
            ))),
        })
        .collect()
}

pub fn load_mapping(path: &Path) -> Result<HashMap<String, String>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| BadgeError::Config(format!("{}: {}", path.display(), e)))?;
    parse_mapping(&contents)
}

/// Apply `mapping` in place and return what changed, in ticket order.
pub fn apply_mapping(tickets: &mut [Ticket], mapping: &HashMap<String, String>) -> Vec<Change> {
    let mut changes = Vec::new();
    for ticket in tickets.iter_mut() {
        if let Some(new_ref) = mapping.get(&ticket.reference) {
            let from = std::mem::replace(&mut ticket.reference, new_ref.clone());
            changes.push(Change { from, to: new_ref.clone() });
        }
    }
    changes
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
