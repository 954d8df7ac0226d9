//! Single-flight token provider
//!
//! [`TokenProvider::token`] returns the cached token while it is fresh. On a
//! miss it starts one renewal on a spawned task and publishes a shared handle
//! to it; every other caller that misses while the renewal is running awaits
//! that same handle. The handle is cleared when the task finishes, success or
//! failure, so the next miss starts a new renewal.
//!
//! Because the renewal runs on its own task, a caller that stops waiting
//! (dropped future, aborted task) does not cancel it for the others.
//!
//! [`TokenProvider::invalidate`] bumps a generation counter. A renewal started
//! before the bump still answers its waiters but never repopulates the store.

use super::{Authenticator, Clock, Credentials, SystemClock, Token, TokenStore};
use crate::config::{ClientConfig, RenewalStrategy};
use crate::error::{ApiError, ApiResult};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

type Renewal = Shared<BoxFuture<'static, ApiResult<Arc<Token>>>>;

/// Hands out valid tokens, logging in or refreshing as needed
///
/// Cloning is cheap; clones share the cached token and any in-flight renewal.
#[derive(Clone)]
pub struct TokenProvider {
    inner: Arc<Inner>,
}

struct Inner {
    credentials: Credentials,
    authenticator: Arc<dyn Authenticator>,
    clock: Arc<dyn Clock>,
    store: TokenStore,
    in_flight: Mutex<Option<Renewal>>,
    generation: AtomicU64,
    refresh_margin: Duration,
    strategy: RenewalStrategy,
}

impl TokenProvider {
    /// Create a provider using the wall clock
    pub fn new(
        credentials: Credentials,
        authenticator: Arc<dyn Authenticator>,
        config: &ClientConfig,
    ) -> Self {
        Self::with_clock(credentials, authenticator, Arc::new(SystemClock), config)
    }

    /// Create a provider with an explicit clock
    pub fn with_clock(
        credentials: Credentials,
        authenticator: Arc<dyn Authenticator>,
        clock: Arc<dyn Clock>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                credentials,
                authenticator,
                clock,
                store: TokenStore::new(),
                in_flight: Mutex::new(None),
                generation: AtomicU64::new(0),
                refresh_margin: config.refresh_margin,
                strategy: config.renewal,
            }),
        }
    }

    /// A token that is valid now.
    ///
    /// Logs in when no token has been obtained yet, renews when the cached
    /// one is within the refresh margin of its expiry, and otherwise returns
    /// the cached token without any network call.
    pub async fn token(&self) -> ApiResult<Arc<Token>> {
        if let Some(token) = self.inner.fresh_token() {
            return Ok(token);
        }

        let renewal = {
            let mut slot = self.inner.lock_in_flight();

            // A renewal may have completed between the first check and the lock.
            if let Some(token) = self.inner.fresh_token() {
                return Ok(token);
            }

            if let Some(renewal) = slot.as_ref() {
                debug!("Joining in-flight token renewal");
                renewal.clone()
            } else {
                let renewal = self.spawn_renewal();
                *slot = Some(renewal.clone());
                renewal
            }
        };

        renewal.await
    }

    /// The cached token, fresh or not
    #[must_use]
    pub fn cached(&self) -> Option<Arc<Token>> {
        self.inner.store.read()
    }

    /// Forget the cached token; the next call to [`token`](Self::token) renews.
    ///
    /// A renewal already in flight completes for its waiters but its token is
    /// not cached.
    pub fn invalidate(&self) {
        let _slot = self.inner.lock_in_flight();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if self.inner.store.clear() {
            debug!("Cached token discarded");
        }
    }

    fn spawn_renewal(&self) -> Renewal {
        let inner = Arc::clone(&self.inner);
        let generation = inner.generation.load(Ordering::SeqCst);
        let handle = tokio::spawn(async move {
            let _slot = ClearSlotOnDrop(Arc::clone(&inner));
            inner
                .renew()
                .await
                .map(|token| inner.publish(token, generation))
        });

        async move {
            handle
                .await
                .unwrap_or_else(|err| Err(ApiError::RenewalAborted(err.to_string())))
        }
        .boxed()
        .shared()
    }
}

impl Inner {
    fn fresh_token(&self) -> Option<Arc<Token>> {
        let now = self.clock.now();
        self.store
            .read()
            .filter(|token| token.is_fresh_at(now, self.refresh_margin))
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<Renewal>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cache `token` unless the provider was invalidated since `generation`
    fn publish(&self, token: Token, generation: u64) -> Arc<Token> {
        // Same lock as `invalidate`, so the check and the replace are atomic.
        let _slot = self.lock_in_flight();
        if self.generation.load(Ordering::SeqCst) == generation {
            self.store.replace(token)
        } else {
            debug!("Provider invalidated during renewal, token not cached");
            Arc::new(token)
        }
    }

    async fn renew(&self) -> ApiResult<Token> {
        let refresh_token = match self.strategy {
            RenewalStrategy::RefreshThenLogin => self
                .store
                .read()
                .and_then(|token| token.refresh_token().map(str::to_owned)),
            RenewalStrategy::AlwaysLogin => None,
        };

        if let Some(refresh_token) = refresh_token {
            debug!("Refreshing access token");
            match self.authenticator.refresh(&refresh_token).await {
                Ok(token) => return Ok(token),
                Err(err) => warn!(error = %err, "Token refresh failed, logging in again"),
            }
        }

        debug!("Logging in");
        self.authenticator.login(&self.credentials).await
    }
}

/// Clears the in-flight slot when the renewal task ends, including by panic
struct ClearSlotOnDrop(Arc<Inner>);

impl Drop for ClearSlotOnDrop {
    fn drop(&mut self) {
        self.0.lock_in_flight().take();
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("credentials", &self.inner.credentials)
            .field("cached", &self.inner.store.read())
            .field("strategy", &self.inner.strategy)
            .finish_non_exhaustive()
    }
}
