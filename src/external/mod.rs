pub mod resend;
pub mod stripe;

pub use resend::*;
pub use stripe::*;
