pub mod database;
pub mod document;
pub mod impls;
pub mod model;

pub use database::Database;
