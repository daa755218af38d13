pub mod announce;
pub mod automod;
pub mod createchannel;
pub mod createrole;
pub mod deletechannel;
pub mod deleterole;
pub mod modlogchannel;
pub mod setprefix;
