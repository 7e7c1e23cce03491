pub mod models;
pub mod pool;
pub mod unique;

pub use pool::{Db, DbInitError};
pub use unique::is_unique;
