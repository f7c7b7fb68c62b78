mod error;
mod handlers;
mod middleware;
mod routes;

pub use error::AppError;
pub use middleware::{Caller, CallerRejection, extract_bearer_token};
pub use routes::{AppState, invitation_routes};
