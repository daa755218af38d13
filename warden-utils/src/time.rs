use std::time::{SystemTime, UNIX_EPOCH};

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Discord relative timestamp markup, e.g. "in 5 minutes".
pub fn relative_timestamp(unix_secs: u64) -> String {
    format!("<t:{}:R>", unix_secs)
}
