pub mod conversation;
pub mod session;
pub mod traits;
