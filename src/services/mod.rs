pub mod authors;
pub mod categories;
pub mod crud;
pub mod posts;
pub mod rate_limiter;
pub mod resolver;
pub mod tags;
