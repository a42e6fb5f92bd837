//! Timeouts, fallbacks and request superseding around a provider.
//!
//! Guidance is decoration: a slow or failing provider must never block or
//! break the player's actions. [`GuidanceService`] bounds every request with a
//! timeout and replaces failures by a canned system message. Requests issued
//! with [`GuidanceService::spawn`] supersede one another, so only the most
//! recent one ever delivers text.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hunter_protocol::Notification;
use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, instrument, warn};

use crate::canned::pick_fallback;
use crate::error::GuidanceError;
use crate::provider::{GuidancePrompt, GuidanceProvider};

/// Default time a provider gets before the fallback is used.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where a piece of guidance text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidanceOrigin {
    /// The provider answered.
    Provider,
    /// The provider failed or timed out and a canned message was used.
    Fallback,
}

/// Text ready to show the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guidance {
    pub text: String,
    pub origin: GuidanceOrigin,
    /// Why the provider failed, for fallback guidance.
    pub failure: Option<String>,
}

impl Guidance {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.origin == GuidanceOrigin::Fallback
    }

    /// The notification announcing this guidance.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self.origin {
            GuidanceOrigin::Provider => Notification::GuidanceUpdated,
            GuidanceOrigin::Fallback => Notification::GuidanceUnavailable,
        }
    }
}

/// A pending guidance request started by [`GuidanceService::spawn`].
#[derive(Debug)]
pub struct GuidanceTicket {
    handle: JoinHandle<Guidance>,
}

impl GuidanceTicket {
    /// Waits for the request.
    ///
    /// Returns `None` if a newer request superseded this one.
    pub async fn wait(self) -> Option<Guidance> {
        match self.handle.await {
            Ok(guidance) => Some(guidance),
            Err(e) if e.is_cancelled() => {
                debug!("guidance request was superseded");
                None
            }
            Err(e) => {
                warn!(error = %e, "guidance task failed");
                None
            }
        }
    }
}

/// Wraps a provider with a timeout, fallbacks and last-request-wins
/// spawning.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use hunter_guidance::{GuidancePrompt, GuidanceService, LocalProvider};
///
/// # async fn example() {
/// let service = GuidanceService::new(Arc::new(LocalProvider::with_seed(1)));
/// let guidance = service
///     .request(GuidancePrompt::Motivation { task_title: None })
///     .await;
/// assert!(!guidance.is_fallback());
/// # }
/// ```
pub struct GuidanceService {
    provider: Arc<dyn GuidanceProvider>,
    timeout: Duration,
    fallback_seed: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl std::fmt::Debug for GuidanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuidanceService")
            .field("provider", &self.provider.name())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GuidanceService {
    /// Wraps `provider` with the default timeout.
    #[must_use]
    pub fn new(provider: Arc<dyn GuidanceProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_TIMEOUT,
            fallback_seed: AtomicU64::new(rand::random()),
            in_flight: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fixes the starting seed of the fallback message rotation.
    #[must_use]
    pub fn with_fallback_seed(self, seed: u64) -> Self {
        self.fallback_seed.store(seed, Ordering::Relaxed);
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Requests guidance and waits for it. Never fails.
    pub async fn request(&self, prompt: GuidancePrompt) -> Guidance {
        let seed = self.next_seed();
        resolve(Arc::clone(&self.provider), prompt, self.timeout, seed).await
    }

    /// Starts a request on the Tokio runtime, cancelling any earlier request
    /// that is still running.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(&self, prompt: GuidancePrompt) -> GuidanceTicket {
        let seed = self.next_seed();
        let handle = tokio::spawn(resolve(
            Arc::clone(&self.provider),
            prompt,
            self.timeout,
            seed,
        ));

        if let Some(previous) = self.in_flight.lock().replace(handle.abort_handle()) {
            previous.abort();
        }
        GuidanceTicket { handle }
    }

    /// Cancels the outstanding spawned request, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.in_flight.lock().take() {
            previous.abort();
        }
    }

    fn next_seed(&self) -> u64 {
        self.fallback_seed.fetch_add(1, Ordering::Relaxed)
    }
}

impl Drop for GuidanceService {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[instrument(skip(provider, prompt), fields(provider = provider.name()))]
async fn resolve(
    provider: Arc<dyn GuidanceProvider>,
    prompt: GuidancePrompt,
    timeout: Duration,
    seed: u64,
) -> Guidance {
    let outcome = match tokio::time::timeout(timeout, provider.request_guidance(&prompt)).await {
        Ok(result) => result,
        Err(_) => Err(GuidanceError::Timeout(timeout)),
    };

    match outcome {
        Ok(text) => Guidance {
            text,
            origin: GuidanceOrigin::Provider,
            failure: None,
        },
        Err(e) => {
            warn!(error = %e, "guidance unavailable, using fallback");
            Guidance {
                text: pick_fallback(seed).to_string(),
                origin: GuidanceOrigin::Fallback,
                failure: Some(e.to_string()),
            }
        }
    }
}
