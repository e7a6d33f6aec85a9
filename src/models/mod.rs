pub mod admin;
pub mod comment;
pub mod common;
pub mod contact;
pub mod entitlement;
pub mod gift;
pub mod membership;
pub mod novel;
pub mod pagination;
pub mod reading;
pub mod user;

pub use admin::*;
pub use comment::*;
pub use common::*;
pub use contact::*;
pub use entitlement::*;
pub use gift::*;
pub use membership::*;
pub use novel::*;
pub use pagination::*;
pub use reading::*;
pub use user::*;
