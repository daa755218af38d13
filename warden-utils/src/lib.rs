/// Yes/no confirmation gate and its Discord button adapter.
pub mod confirmation;
/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (action names, durations, mention escaping).
pub mod formatting;
/// Shared pagination helper utilities.
pub mod pagination;
/// Pure parser helpers.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
/// Shared time helpers.
pub mod time;

/// Default message-command prefix when a guild has not set its own.
pub const DEFAULT_PREFIX: &str = "!";
/// Longest prefix a guild may configure.
pub const MAX_PREFIX_LEN: usize = 5;
