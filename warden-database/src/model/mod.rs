pub mod afk;
pub mod automod;
pub mod scheduled;
pub mod warnings;
