use serde::{Deserialize, Serialize};

/// A delayed action that must survive restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: u64,
    pub due_at: u64,
    pub kind: TaskKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    /// Remove the mute role once a timed mute runs out.
    Unmute {
        guild_id: u64,
        user_id: u64,
        role_id: u64,
        /// Channel the mute was issued from; the expiry notice goes there.
        channel_id: u64,
    },
    Reminder {
        user_id: u64,
        channel_id: u64,
        message: String,
        created_at: u64,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleBook {
    pub next_id: u64,
    pub tasks: Vec<ScheduledTask>,
}
