//! Lazily acquired bearer session shared by all provider calls.
//!
//! The token is the only mutable state of the provider. It lives behind an
//! async mutex that is held for the whole login round trip, so concurrent
//! callers that find the slot empty wait for one login instead of racing.
//! Invalidation is compare-and-clear: a caller may only drop the token it
//! actually used, never one that another caller refreshed in the meantime.

use std::future::Future;
use tokio::sync::Mutex;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Bearer token returned by the provider's session endpoint.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Holder of at most one session token.
#[derive(Default)]
pub struct SessionSlot {
    token: Mutex<Option<SessionToken>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with a token.
    #[cfg(test)]
    pub(crate) fn with_token(token: SessionToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    /// The token currently held, if any.
    #[cfg(test)]
    pub(crate) async fn current(&self) -> Option<SessionToken> {
        self.token.lock().await.clone()
    }

    /// Return the held token, or run `login` to obtain one.
    ///
    /// A failed login (`None`) leaves the slot empty; the next call will
    /// try again.
    pub async fn get_or_login<F, Fut>(&self, login: F) -> Option<SessionToken>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<SessionToken>>,
    {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Some(token.clone());
        }

        let token = login().await?;
        *guard = Some(token.clone());
        Some(token)
    }

    /// Clear the slot if it still holds `stale`.
    ///
    /// Returns true when a token was removed.
    pub async fn invalidate(&self, stale: Option<&SessionToken>) -> bool {
        let mut guard = self.token.lock().await;
        match (guard.as_ref(), stale) {
            (Some(current), Some(stale)) if current == stale => {
                *guard = None;
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for SessionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSlot").finish_non_exhaustive()
    }
}
