//! CLI command implementations.

mod ask;
mod config;
mod doctor;
mod languages;
mod serve;
mod transcript;

pub use ask::run_ask;
pub use config::run_config;
pub use doctor::run_doctor;
pub use languages::run_languages;
pub use serve::run_serve;
pub use transcript::run_transcript;
