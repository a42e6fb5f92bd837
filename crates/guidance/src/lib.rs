//! Guidance text for the hunter application.
//!
//! Guidance is the motivational and assistant text shown next to the
//! player's dungeons. It can come from several places:
//!
//! - [`LocalProvider`]: built-in phrase tables, always available
//! - [`RemoteGuidanceClient`]: a relay endpoint speaking the
//!   [`GuidanceRequest`]/[`GuidanceResponse`] JSON protocol
//! - [`RelayProvider`]: the relay logic run in-process over a
//!   [`ChatBackend`](openai::ChatBackend) such as
//!   [`ChatCompletionsClient`](openai::ChatCompletionsClient)
//!
//! Every provider implements [`GuidanceProvider`]. Front-ends should go
//! through a [`GuidanceService`], which adds a timeout, replaces failures
//! with a canned message from [`pick_fallback`] and lets a newer request
//! supersede an older one.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use hunter_guidance::{GuidancePrompt, GuidanceService, LocalProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let service = GuidanceService::new(Arc::new(LocalProvider::with_seed(42)))
//!     .with_timeout(Duration::from_secs(5));
//!
//! let guidance = service
//!     .request(GuidancePrompt::motivation_for("Daily Combat Training"))
//!     .await;
//! println!("{}", guidance.text);
//! # }
//! ```

pub mod canned;
pub mod client;
pub mod error;
pub mod openai;
pub mod provider;
pub mod relay;
pub mod service;
pub mod wire;

#[cfg(test)]
mod test_server;

pub use canned::{SystemMessage, pick_fallback, system_message};
pub use client::RemoteGuidanceClient;
pub use error::{GuidanceError, Result};
pub use provider::{GuidancePrompt, GuidanceProvider, LocalProvider};
pub use relay::{RelayProvider, RelayReply};
pub use service::{Guidance, GuidanceOrigin, GuidanceService, GuidanceTicket};
pub use wire::{GuidanceRequest, GuidanceResponse};
