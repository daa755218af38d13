pub mod fun;
mod gate;
pub mod management;
pub mod moderation;
pub mod utility;

use warden_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    utility::poll::META,
    utility::afk::META,
    utility::remind::META,
    utility::reminders::META,
    utility::userinfo::META,
    utility::serverinfo::META,
    moderation::kick::META,
    moderation::nick::META,
    moderation::role::META,
    moderation::dm::META,
    moderation::ban::META,
    moderation::unban::META,
    moderation::softban::META,
    moderation::masskick::META,
    moderation::massban::META,
    moderation::mute::META,
    moderation::unmute::META,
    moderation::warn::META,
    moderation::warnings::META,
    moderation::clearwarnings::META,
    moderation::clearallwarnings::META,
    moderation::purge::META,
    moderation::slowmode::META,
    moderation::lockdown::META,
    moderation::unlock::META,
    management::setprefix::META,
    management::modlogchannel::META,
    management::announce::META,
    management::automod::META,
    management::createrole::META,
    management::deleterole::META,
    management::createchannel::META,
    management::deletechannel::META,
    fun::tictactoe::META,
    fun::eightball::META,
    fun::meme::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        utility::poll::poll(),
        utility::afk::afk(),
        utility::remind::remind(),
        utility::reminders::reminders(),
        utility::userinfo::userinfo(),
        utility::serverinfo::serverinfo(),
        moderation::kick::kick(),
        moderation::nick::nick(),
        moderation::role::role(),
        moderation::dm::dm(),
        moderation::ban::ban(),
        moderation::unban::unban(),
        moderation::softban::softban(),
        moderation::masskick::masskick(),
        moderation::massban::massban(),
        moderation::mute::mute(),
        moderation::unmute::unmute(),
        moderation::warn::warn(),
        moderation::warnings::warnings(),
        moderation::clearwarnings::clearwarnings(),
        moderation::clearallwarnings::clearallwarnings(),
        moderation::purge::purge(),
        moderation::slowmode::slowmode(),
        moderation::lockdown::lockdown(),
        moderation::unlock::unlock(),
        management::setprefix::setprefix(),
        management::modlogchannel::modlogchannel(),
        management::announce::announce(),
        management::automod::automod(),
        management::createrole::createrole(),
        management::deleterole::deleterole(),
        management::createchannel::createchannel(),
        management::deletechannel::deletechannel(),
        fun::tictactoe::tictactoe(),
        fun::eightball::eightball(),
        fun::meme::meme(),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{COMMANDS, commands};

    #[test]
    fn every_registered_command_has_metadata() {
        let registered: HashSet<String> = commands().into_iter().map(|command| command.name).collect();
        let described: HashSet<String> = COMMANDS.iter().map(|meta| meta.name.to_owned()).collect();
        assert_eq!(registered, described);
        assert_eq!(COMMANDS.len(), described.len());
    }
}
