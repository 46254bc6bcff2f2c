mod models;
mod operations;

pub use models::StoredIdentity;
pub use operations::*;
