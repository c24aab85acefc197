//! VPN peer provisioning against an external management API.
//!
//! [`ResourceProvider`] is the seam the command handlers talk to;
//! [`WgEasyClient`] is the production implementation backed by the
//! wg-easy web API.
//!
//! The operations deliberately differ in how they fail: `create_client` and
//! `get_client` return errors for the caller to report, while
//! `delete_client` and `list_clients` degrade to `false` / an empty list.

pub mod session;
pub mod wg_easy;

pub use session::{SessionSlot, SessionToken};
pub use wg_easy::{WgEasyClient, REQUEST_TIMEOUT};

use crate::error::AppResult;
use async_trait::async_trait;

/// A provisioned WireGuard peer as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedClient {
    pub id: String,
    pub name: String,
    pub address: String,
    pub public_key: String,
    /// Full client config. Only populated by `create_client` and
    /// `get_client`; list responses leave it empty.
    pub configuration: String,
    pub enabled: bool,
}

/// Administrative operations on VPN peers.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Create a peer named `name` and fetch its configuration.
    async fn create_client(&self, name: &str) -> AppResult<ManagedClient>;

    /// Delete a peer. Any failure is reported as `false`.
    async fn delete_client(&self, client_id: &str) -> bool;

    /// Fetch a single peer including its configuration.
    async fn get_client(&self, client_id: &str) -> AppResult<ManagedClient>;

    /// List all peers in provider order. Any failure yields an empty list.
    async fn list_clients(&self) -> Vec<ManagedClient>;
}
