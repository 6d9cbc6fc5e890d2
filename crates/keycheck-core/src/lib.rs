//! Credential checks for LLM providers: load secrets, probe each provider once,
//! classify failures and report.

pub mod classify;
pub mod config;
pub mod env;
pub mod output;
pub mod paths;
pub mod probe;
pub mod report;
pub mod text;
pub mod types;

pub use classify::{classify_error, friendly_message};
pub use config::{Config, ProbeSettings};
pub use env::{EnvError, Environment};
pub use probe::{run_probes, CompletionBackend, Prober};
pub use report::{exit_code, partition, report};
pub use types::{default_descriptors, ErrorKind, ProbeResult, ProviderDescriptor};
