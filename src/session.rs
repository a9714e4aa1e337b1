use crate::error::{PadError, Result};
use crate::remote::RemoteControlClient;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

/// One remote operation, dispatched by [`RemoteSession::call`].
#[derive(Debug, Clone, Copy)]
pub enum RemoteOp<'a> {
    SetScene(&'a str),
    ToggleMic,
    StartRecording,
    StopRecording,
    ToggleRecording,
    StartStreaming,
    StopStreaming,
    ToggleStreaming,
}

/// The managed connection to the control backend.
///
/// The backend is frequently not running when the daemon starts and
/// drops the control channel intermittently, so every operation goes
/// through one chokepoint: take the session lock, make at most one
/// connect attempt if disconnected, then perform the call. A failure is
/// returned to the caller, never retried in a loop. The single lock also
/// collapses connect storms to one attempt and keeps the filter-toggle
/// read-modify-write atomic with respect to other triggers.
pub struct RemoteSession {
    client: Arc<dyn RemoteControlClient>,
    state: Mutex<SessionState>,
}

impl RemoteSession {
    pub fn new(client: Arc<dyn RemoteControlClient>) -> Self {
        Self {
            client,
            state: Mutex::new(SessionState::Disconnected),
        }
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    /// Attempt a handshake. No-op success when already connected.
    ///
    /// # Errors
    /// Returns the transport error on failure; state stays `Disconnected`
    /// and the caller decides whether to retry.
    pub async fn connect(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.connect_locked(&mut state).await
    }

    /// Make the session usable, connecting at most once if needed.
    ///
    /// # Errors
    /// Propagates the single connect attempt's failure.
    pub async fn ensure_connected(&self) -> Result<()> {
        self.connect().await
    }

    async fn connect_locked(&self, state: &mut SessionState) -> Result<()> {
        if *state == SessionState::Connected {
            return Ok(());
        }
        self.client.connect().await?;
        *state = SessionState::Connected;
        Ok(())
    }

    /// Execute one remote operation, lazily connecting first.
    ///
    /// # Errors
    /// `Connection` when the backend is unreachable (the session drops
    /// back to `Disconnected` so the next trigger retries), `Protocol`
    /// when the backend rejected the call.
    pub async fn call(&self, op: RemoteOp<'_>) -> Result<()> {
        let mut state = self.state.lock().await;
        self.connect_locked(&mut state).await?;

        let result = match op {
            RemoteOp::SetScene(name) => self.client.set_scene(name).await,
            RemoteOp::ToggleMic => self.client.toggle_mic().await,
            RemoteOp::StartRecording => self.client.start_recording().await,
            RemoteOp::StopRecording => self.client.stop_recording().await,
            RemoteOp::ToggleRecording => self.client.toggle_recording().await,
            RemoteOp::StartStreaming => self.client.start_streaming().await,
            RemoteOp::StopStreaming => self.client.stop_streaming().await,
            RemoteOp::ToggleStreaming => self.client.toggle_streaming().await,
        };
        self.sink_transport_failure(&mut state, result)
    }

    /// Flip the enabled state of a filter and return the new state.
    ///
    /// The read and the write happen under one hold of the session lock,
    /// so two concurrent toggles of the same filter cannot observe the
    /// same pre-toggle state.
    ///
    /// # Errors
    /// `Protocol` if the source or filter does not exist (the query
    /// result is never guessed), `Connection` on transport failure.
    pub async fn toggle_filter(&self, source: &str, filter: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        self.connect_locked(&mut state).await?;

        let result = async {
            let enabled = self.client.get_filter_enabled(source, filter).await?;
            self.client
                .set_filter_enabled(source, filter, !enabled)
                .await?;
            Ok(!enabled)
        }
        .await;
        self.sink_transport_failure(&mut state, result)
    }

    /// Available input names, for selection surfaces. Advisory: returns
    /// empty on any failure instead of propagating.
    pub async fn list_inputs(&self) -> Vec<String> {
        let mut state = self.state.lock().await;
        if let Err(e) = self.connect_locked(&mut state).await {
            warn!("cannot list inputs: {e}");
            return Vec::new();
        }
        match self.sink_transport_failure(&mut state, self.client.list_inputs().await) {
            Ok(inputs) => inputs,
            Err(e) => {
                warn!("cannot list inputs: {e}");
                Vec::new()
            }
        }
    }

    /// Filter names on a source. Advisory, like [`Self::list_inputs`].
    pub async fn list_filters(&self, source: &str) -> Vec<String> {
        let mut state = self.state.lock().await;
        if let Err(e) = self.connect_locked(&mut state).await {
            warn!("cannot list filters on '{source}': {e}");
            return Vec::new();
        }
        match self.sink_transport_failure(&mut state, self.client.list_filters(source).await) {
            Ok(filters) => filters,
            Err(e) => {
                warn!("cannot list filters on '{source}': {e}");
                Vec::new()
            }
        }
    }

    /// Tear the connection down. Idempotent; transport errors during
    /// teardown are logged, not propagated.
    pub async fn disconnect(&self) {
        let mut state = self.state.lock().await;
        if *state == SessionState::Disconnected {
            return;
        }
        if let Err(e) = self.client.disconnect().await {
            warn!("error during disconnect: {e}");
        }
        *state = SessionState::Disconnected;
        debug!("session disconnected");
    }

    /// A transport failure after a successful connect drops the session
    /// back to `Disconnected` so the next trigger reconnects. Protocol
    /// rejections leave the connection up.
    fn sink_transport_failure<T>(
        &self,
        state: &mut SessionState,
        result: Result<T>,
    ) -> Result<T> {
        if matches!(result, Err(PadError::Connection(_))) {
            *state = SessionState::Disconnected;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeRemote;
    use std::sync::atomic::Ordering;

    fn session_with(fake: &Arc<FakeRemote>) -> RemoteSession {
        RemoteSession::new(fake.clone())
    }

    #[tokio::test]
    async fn ensure_connected_is_idempotent() {
        let fake = Arc::new(FakeRemote::new());
        let session = session_with(&fake);

        session.ensure_connected().await.unwrap();
        session.ensure_connected().await.unwrap();

        assert_eq!(fake.connects.load(Ordering::SeqCst), 1);
        assert_eq!(session.state().await, SessionState::Connected);
    }

    #[tokio::test]
    async fn failed_connect_stays_disconnected_and_retries_next_time() {
        let fake = Arc::new(FakeRemote::new());
        fake.fail_connect.store(true, Ordering::SeqCst);
        let session = session_with(&fake);

        assert!(session.ensure_connected().await.is_err());
        assert_eq!(session.state().await, SessionState::Disconnected);

        fake.fail_connect.store(false, Ordering::SeqCst);
        session.ensure_connected().await.unwrap();
        assert_eq!(fake.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn call_connects_lazily_exactly_once() {
        let fake = Arc::new(FakeRemote::new());
        let session = session_with(&fake);

        session.call(RemoteOp::SetScene("Main")).await.unwrap();

        assert_eq!(fake.connects.load(Ordering::SeqCst), 1);
        assert_eq!(fake.call_log(), vec!["set_scene:Main"]);
    }

    #[tokio::test]
    async fn failed_connect_aborts_call() {
        let fake = Arc::new(FakeRemote::new());
        fake.fail_connect.store(true, Ordering::SeqCst);
        let session = session_with(&fake);

        assert!(session.call(RemoteOp::ToggleMic).await.is_err());

        // No action call reached the backend.
        assert!(fake.call_log().is_empty());
        assert_eq!(session.state().await, SessionState::Disconnected);
    }

    #[tokio::test]
    async fn transport_failure_drops_to_disconnected_then_reconnects() {
        let fake = Arc::new(FakeRemote::new());
        let session = session_with(&fake);
        session.ensure_connected().await.unwrap();

        fake.fail_transport.store(true, Ordering::SeqCst);
        assert!(session.call(RemoteOp::StartRecording).await.is_err());
        assert_eq!(session.state().await, SessionState::Disconnected);

        fake.fail_transport.store(false, Ordering::SeqCst);
        session.call(RemoteOp::StartRecording).await.unwrap();
        assert_eq!(fake.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn protocol_rejection_keeps_connection_up() {
        let fake = Arc::new(FakeRemote::new());
        let session = session_with(&fake);

        let result = session.toggle_filter("Webcam", "Missing").await;
        assert!(matches!(result, Err(PadError::Protocol(_))));
        assert_eq!(session.state().await, SessionState::Connected);
    }

    #[tokio::test]
    async fn toggle_flips_and_flips_back() {
        let fake = Arc::new(FakeRemote::new().with_filter("Webcam", "Color Correction", true));
        let session = session_with(&fake);

        let now = session.toggle_filter("Webcam", "Color Correction").await.unwrap();
        assert!(!now);
        assert_eq!(fake.filter_state("Webcam", "Color Correction"), Some(false));

        let now = session.toggle_filter("Webcam", "Color Correction").await.unwrap();
        assert!(now);
        assert_eq!(fake.filter_state("Webcam", "Color Correction"), Some(true));

        assert_eq!(
            fake.call_log(),
            vec![
                "get_filter:Webcam/Color Correction",
                "set_filter:Webcam/Color Correction=false",
                "get_filter:Webcam/Color Correction",
                "set_filter:Webcam/Color Correction=true",
            ]
        );
    }

    #[tokio::test]
    async fn concurrent_toggles_do_not_lose_updates() {
        let fake = Arc::new(FakeRemote::new().with_filter("Webcam", "Blur", false));
        let session = Arc::new(session_with(&fake));

        const N: usize = 7;
        let triggers = (0..N).map(|_| {
            let session = session.clone();
            tokio::spawn(async move { session.toggle_filter("Webcam", "Blur").await })
        });
        for handle in futures::future::join_all(triggers).await {
            handle.unwrap().unwrap();
        }

        // Odd number of toggles: final state is the negation.
        assert_eq!(fake.filter_state("Webcam", "Blur"), Some(N % 2 == 1));
    }

    #[tokio::test]
    async fn connect_storm_collapses_to_one_attempt() {
        let fake = Arc::new(FakeRemote::new());
        let session = Arc::new(session_with(&fake));

        let calls = (0..8).map(|_| {
            let session = session.clone();
            tokio::spawn(async move { session.call(RemoteOp::ToggleStreaming).await })
        });
        for handle in futures::future::join_all(calls).await {
            handle.unwrap().unwrap();
        }

        assert_eq!(fake.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn listings_are_best_effort() {
        let fake = Arc::new(FakeRemote::new().with_filter("Webcam", "Blur", false));
        fake.fail_connect.store(true, Ordering::SeqCst);
        let session = session_with(&fake);

        assert!(session.list_inputs().await.is_empty());
        assert!(session.list_filters("Webcam").await.is_empty());

        fake.fail_connect.store(false, Ordering::SeqCst);
        assert_eq!(session.list_inputs().await, vec!["Mic/Aux", "Webcam"]);
        assert_eq!(session.list_filters("Webcam").await, vec!["Blur"]);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let fake = Arc::new(FakeRemote::new());
        let session = session_with(&fake);

        session.disconnect().await;
        session.ensure_connected().await.unwrap();
        session.disconnect().await;
        session.disconnect().await;
        assert_eq!(session.state().await, SessionState::Disconnected);

        // Only the connected→disconnected transition reached the transport.
        assert_eq!(fake.disconnects.load(Ordering::SeqCst), 1);
    }
}
