pub mod api_client;
pub mod configuration;
pub mod foundation;
pub mod render;
pub mod routes;
pub mod session;
pub mod startup;
pub mod view;

pub use api_client::{ApiError, Backend, HttpBackend};
pub use configuration::*;
pub use foundation::database::*;
pub use routes::Route;
pub use session::{SessionResolver, SessionState};
