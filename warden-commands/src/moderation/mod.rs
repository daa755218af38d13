pub mod ban;
pub mod clearallwarnings;
pub mod clearwarnings;
pub mod dm;
pub mod kick;
pub mod lockdown;
pub mod massban;
pub mod masskick;
pub mod mute;
pub mod nick;
pub mod purge;
pub mod role;
pub mod slowmode;
pub mod softban;
pub mod unban;
pub mod unlock;
pub mod unmute;
pub mod warn;
pub mod warnings;

pub(crate) mod checks;
pub(crate) mod embeds;
pub mod logging;
mod mass;

pub use embeds::{is_missing_permissions_error, notify_moderation_target};
pub use logging::{ModLogEntry, ModLogTarget, publish_modlog_entry};
