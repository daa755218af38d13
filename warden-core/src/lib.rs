use warden_database::Database;
use warden_game::GameRegistry;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub games: GameRegistry,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
