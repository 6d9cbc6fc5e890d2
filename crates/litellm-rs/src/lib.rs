pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod providers;
pub mod router;
pub mod types;

pub use client::LiteLLM;
pub use config::{Config, ProviderConfig, ProviderKind};
pub use error::{LiteLLMError, Result};
pub use types::*;
