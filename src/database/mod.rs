pub mod manager;
pub mod mutation;
pub mod record;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use mutation::{MutationBuilder, MutationError, SqlStatement, WritableRecord};
pub use record::{MaterialRecord, RecordCodec};
pub use store::{MaterialStore, SqliteStore};
