pub mod authors;
pub mod categories;
pub mod health;
pub mod posts;
pub mod tags;
