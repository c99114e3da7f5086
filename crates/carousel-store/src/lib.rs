pub mod database;
pub mod error;
pub mod links;
pub mod schema;
pub mod store;

pub use database::Database;
pub use error::StoreError;
pub use links::LinkRepo;
pub use store::{LinkStore, SqliteLinkStore};
