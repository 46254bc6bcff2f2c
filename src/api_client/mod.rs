mod api_error;
mod client;

pub use api_error::ApiError;
#[cfg(test)]
pub use client::MockBackend;
pub use client::{Backend, HttpBackend};
