use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfkRecord {
    pub reason: String,
    pub since: u64,
}
