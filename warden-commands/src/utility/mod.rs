pub mod afk;
pub mod embeds;
pub mod help;
pub mod ping;
pub mod poll;
pub mod remind;
pub mod reminders;
pub mod serverinfo;
pub mod usage;
pub mod userinfo;
