//! Network access to the generative-text backend.

pub mod advisor;
pub mod config;
pub mod error;
pub mod stream;
pub mod wire;

pub use advisor::{Advisor, GeminiAdvisor};
pub use config::AdvisorConfig;
pub use error::AdvisorError;
