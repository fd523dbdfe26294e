pub mod config;
pub mod error;
pub mod prompts;
pub mod text;
pub mod types;

// Keep the public surface small and intentional.
pub use config::*;
pub use error::*;
pub use prompts::*;
pub use text::*;
pub use types::*;
