pub mod models;
pub mod tags;
