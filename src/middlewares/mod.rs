pub mod auth;
pub mod cors;

pub use auth::{CurrentUser, IdentityMiddleware, current_user_id};
pub use cors::create_cors;
