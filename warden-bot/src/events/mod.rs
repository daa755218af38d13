pub mod afk;
pub mod automod;
