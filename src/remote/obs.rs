use super::RemoteControlClient;
use crate::error::{PadError, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Input name OBS uses for the default microphone.
const MIC_INPUT: &str = "Mic/Aux";

/// Where to reach the OBS WebSocket server.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl Endpoint {
    /// Read `OBS_HOST` / `OBS_PORT` / `OBS_PASSWORD`, falling back to
    /// `localhost:4455` with no credential.
    pub fn from_env() -> Self {
        let host = std::env::var("OBS_HOST").unwrap_or_else(|_| "localhost".into());
        let port = std::env::var("OBS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4455);
        let password = std::env::var("OBS_PASSWORD").ok().filter(|p| !p.is_empty());
        Self { host, port, password }
    }
}

/// OBS WebSocket implementation of the remote control capability.
///
/// The handshake produces a live `obws::Client`, so the connected state
/// is the presence of one. The session serializes access; the lock here
/// only carries the option across connect/disconnect.
pub struct ObsRemote {
    endpoint: Endpoint,
    client: RwLock<Option<obws::Client>>,
}

impl ObsRemote {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            client: RwLock::new(None),
        }
    }
}

fn map_obs_err(e: obws::Error) -> PadError {
    match e {
        obws::Error::Api { code, message } => PadError::Protocol(match message {
            Some(msg) => format!("{msg} ({code:?})"),
            None => format!("{code:?}"),
        }),
        other => PadError::Connection(other.to_string()),
    }
}

macro_rules! with_client {
    ($self:ident, $client:ident => $call:expr) => {{
        let guard = $self.client.read().await;
        let Some($client) = guard.as_ref() else {
            return Err(PadError::Connection("not connected".into()));
        };
        $call.map_err(map_obs_err)?;
        Ok(())
    }};
}

#[async_trait]
impl RemoteControlClient for ObsRemote {
    async fn connect(&self) -> Result<()> {
        info!(
            "connecting to OBS at {}:{}",
            self.endpoint.host, self.endpoint.port
        );
        let client = obws::Client::connect(
            self.endpoint.host.clone(),
            self.endpoint.port,
            self.endpoint.password.clone(),
        )
        .await
        .map_err(|e| PadError::Connection(e.to_string()))?;

        *self.client.write().await = Some(client);
        info!("OBS WebSocket connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        if let Some(mut client) = self.client.write().await.take() {
            client.disconnect().await;
            debug!("OBS WebSocket disconnected");
        }
        Ok(())
    }

    async fn set_scene(&self, name: &str) -> Result<()> {
        with_client!(self, client => client.scenes().set_current_program_scene(name).await)
    }

    async fn toggle_mic(&self) -> Result<()> {
        with_client!(self, client => client.inputs().toggle_mute(MIC_INPUT).await)
    }

    async fn start_recording(&self) -> Result<()> {
        with_client!(self, client => client.recording().start().await)
    }

    async fn stop_recording(&self) -> Result<()> {
        with_client!(self, client => client.recording().stop().await)
    }

    async fn toggle_recording(&self) -> Result<()> {
        with_client!(self, client => client.recording().toggle().await)
    }

    async fn start_streaming(&self) -> Result<()> {
        with_client!(self, client => client.streaming().start().await)
    }

    async fn stop_streaming(&self) -> Result<()> {
        with_client!(self, client => client.streaming().stop().await)
    }

    async fn toggle_streaming(&self) -> Result<()> {
        with_client!(self, client => client.streaming().toggle().await)
    }

    async fn get_filter_enabled(&self, source: &str, filter: &str) -> Result<bool> {
        let guard = self.client.read().await;
        let Some(client) = guard.as_ref() else {
            return Err(PadError::Connection("not connected".into()));
        };
        let state = client
            .filters()
            .get(source, filter)
            .await
            .map_err(map_obs_err)?;
        Ok(state.enabled)
    }

    async fn set_filter_enabled(&self, source: &str, filter: &str, enabled: bool) -> Result<()> {
        with_client!(self, client => client
            .filters()
            .set_enabled(obws::requests::filters::SetEnabled {
                source,
                filter,
                enabled,
            })
            .await)
    }

    async fn list_inputs(&self) -> Result<Vec<String>> {
        let guard = self.client.read().await;
        let Some(client) = guard.as_ref() else {
            return Err(PadError::Connection("not connected".into()));
        };
        let inputs = client.inputs().list(None).await.map_err(map_obs_err)?;
        Ok(inputs.into_iter().map(|i| i.name).collect())
    }

    async fn list_filters(&self, source: &str) -> Result<Vec<String>> {
        let guard = self.client.read().await;
        let Some(client) = guard.as_ref() else {
            return Err(PadError::Connection("not connected".into()));
        };
        let filters = client.filters().list(source).await.map_err(map_obs_err)?;
        Ok(filters.into_iter().map(|f| f.name).collect())
    }
}
