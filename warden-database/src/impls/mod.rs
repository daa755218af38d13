pub mod afk;
pub mod automod;
pub mod modlog_config;
pub mod prefixes;
pub mod scheduled;
pub mod warnings;
