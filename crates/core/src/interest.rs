//! The per-property interested-user set.
//!
//! Stored as a JSON array of user ids. Rows written by older clients may hold
//! a stringified array or something else entirely, so reads go through
//! [`normalize`], which never fails.

use serde_json::Value;

use crate::types::DbId;

/// The interested-user set after normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestSet {
    ids: Vec<DbId>,
    /// The stored value was not a clean array of ids.
    repaired: bool,
}

impl InterestSet {
    pub fn ids(&self) -> &[DbId] {
        &self.ids
    }

    pub fn was_repaired(&self) -> bool {
        self.repaired
    }

    pub fn contains(&self, user_id: DbId) -> bool {
        self.ids.contains(&user_id)
    }

    /// Add `user_id`. Returns `false` if it was already present.
    pub fn insert(&mut self, user_id: DbId) -> bool {
        if self.contains(user_id) {
            return false;
        }
        self.ids.push(user_id);
        true
    }

    pub fn to_json(&self) -> Value {
        Value::from(self.ids.clone())
    }
}

fn id_from(entry: &Value) -> Option<DbId> {
    match entry {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Normalise a stored interested-user value.
///
/// - an array keeps its id-like entries (numbers or numeric strings), first
///   occurrence wins;
/// - a string is reparsed as JSON and must yield an array;
/// - anything else (including `null`) becomes the empty set.
pub fn normalize(stored: &Value) -> InterestSet {
    let reparsed;
    let (entries, mut repaired) = match stored {
        Value::Array(items) => (items.as_slice(), false),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => {
                reparsed = items;
                (reparsed.as_slice(), true)
            }
            _ => (&[][..], true),
        },
        Value::Null => (&[][..], false),
        _ => (&[][..], true),
    };

    let mut set = InterestSet {
        ids: Vec::with_capacity(entries.len()),
        repaired: false,
    };
    for entry in entries {
        match id_from(entry) {
            Some(id) => {
                if !set.insert(id) {
                    repaired = true;
                }
                if !entry.is_number() {
                    repaired = true;
                }
            }
            None => repaired = true,
        }
    }
    set.repaired = repaired;
    set
}
