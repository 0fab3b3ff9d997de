// Executing resolved scopes through Sea-ORM

pub mod execute;

pub use execute::{count_total, fetch_all, fetch_page};
