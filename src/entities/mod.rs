pub mod prelude;

pub mod authors;
pub mod categories;
pub mod post_tags;
pub mod posts;
pub mod tags;
