use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEntry {
    pub warned_at: u64,
    pub moderator_id: u64,
    pub reason: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarningRecord {
    pub warn_number: usize,
}

/// guild id -> user id -> warnings in the order they were issued.
pub type WarningBook = HashMap<u64, HashMap<u64, Vec<WarningEntry>>>;
