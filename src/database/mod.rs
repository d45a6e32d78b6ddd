pub mod manager;
pub mod models;
pub mod query;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{PgPostStore, PostStore};
