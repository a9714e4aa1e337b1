pub mod obs;

use crate::error::Result;
use async_trait::async_trait;

/// Transport to the remote control backend.
///
/// [`crate::session::RemoteSession`] owns the only instance and
/// serializes all access; implementations may assume calls never
/// overlap. Every method can fail with `Connection` (transport) or
/// `Protocol` (backend rejected the call) errors, which the session
/// treats uniformly per trigger.
#[async_trait]
pub trait RemoteControlClient: Send + Sync {
    /// Perform a fresh transport handshake.
    async fn connect(&self) -> Result<()>;

    /// Tear the transport down. Must tolerate not being connected.
    async fn disconnect(&self) -> Result<()>;

    async fn set_scene(&self, name: &str) -> Result<()>;
    async fn toggle_mic(&self) -> Result<()>;
    async fn start_recording(&self) -> Result<()>;
    async fn stop_recording(&self) -> Result<()>;
    async fn toggle_recording(&self) -> Result<()>;
    async fn start_streaming(&self) -> Result<()>;
    async fn stop_streaming(&self) -> Result<()>;
    async fn toggle_streaming(&self) -> Result<()>;

    async fn get_filter_enabled(&self, source: &str, filter: &str) -> Result<bool>;
    async fn set_filter_enabled(&self, source: &str, filter: &str, enabled: bool) -> Result<()>;

    async fn list_inputs(&self) -> Result<Vec<String>>;
    async fn list_filters(&self, source: &str) -> Result<Vec<String>>;
}
