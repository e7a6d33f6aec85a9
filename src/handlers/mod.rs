pub mod admin;
pub mod auth;
pub mod bookshelf;
pub mod comment;
pub mod contact;
pub mod gift;
pub mod novel;
pub mod payment;
pub mod reading;
pub mod user;

pub use admin::admin_config;
pub use auth::auth_config;
pub use bookshelf::bookshelf_config;
pub use comment::comment_config;
pub use contact::contact_config;
pub use gift::gift_config;
pub use novel::novel_config;
pub use payment::payment_config;
pub use reading::reading_config;
pub use user::user_config;
