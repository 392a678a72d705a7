//! weatherbuddy — a quota-gated weather assistant over OpenAI-compatible APIs.
//!
//! A query goes through the [`orchestrator`], which enforces the free-tier
//! quota, then the [`gateway`], which calls the chat-completion endpoint in
//! JSON mode, [`repair`]s whatever text comes back into a
//! [`types::StructuredReply`], and recovers from structured-output failures
//! with a live [`weather`] lookup. The result is a [`outcome::QueryOutcome`]
//! that UI shells settle against their own [`session::Session`].
//!
//! # Quick start
//!
//! ```no_run
//! use weatherbuddy::config::load_config;
//! use weatherbuddy::orchestrator::Orchestrator;
//!
//! # async fn example() -> Result<(), weatherbuddy::error::ConfigError> {
//! let config = load_config(None)?;
//! let orchestrator = Orchestrator::new(&config);
//! let outcome = orchestrator.handle_query("weather in Paris?", None, 1).await;
//! println!("{}", serde_json::to_string(&outcome).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod build_info;
pub mod config;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod outcome;
pub mod prompt;
pub mod quota;
pub mod render;
pub mod repair;
pub mod session;
#[cfg(test)]
pub mod testsupport;
pub mod types;
pub mod weather;
