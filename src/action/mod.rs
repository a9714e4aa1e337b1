pub mod catalog;
pub mod program;

use crate::error::Result;
use crate::session::{RemoteOp, RemoteSession};
use std::fmt;
use tracing::info;

/// The closed set of actions a key can be bound to.
///
/// Every variant carries exactly the parameters it needs, fully
/// validated before it is ever stored (see [`catalog::build`]). This
/// keeps bindings serializable and lets [`execute`] stay a pure
/// interpreter over the variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionKind {
    SetScene { scene: String },
    ToggleMic,
    StartRecording,
    StopRecording,
    ToggleRecording,
    StartStreaming,
    StopStreaming,
    ToggleStreaming,
    ToggleFilter { source: String, filter: String },
    RunProgram { command: String },
    #[default]
    Unbound,
}

impl ActionKind {
    /// Stable tag used in the persisted config document.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ActionKind::SetScene { .. } => "set_scene",
            ActionKind::ToggleMic => "toggle_mic",
            ActionKind::StartRecording => "start_recording",
            ActionKind::StopRecording => "stop_recording",
            ActionKind::ToggleRecording => "toggle_recording",
            ActionKind::StartStreaming => "start_streaming",
            ActionKind::StopStreaming => "stop_streaming",
            ActionKind::ToggleStreaming => "toggle_streaming",
            ActionKind::ToggleFilter { .. } => "toggle_filter",
            ActionKind::RunProgram { .. } => "run_program",
            ActionKind::Unbound => "unbound",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::SetScene { scene } => write!(f, "set scene '{scene}'"),
            ActionKind::ToggleFilter { source, filter } => {
                write!(f, "toggle filter '{filter}' on '{source}'")
            }
            ActionKind::RunProgram { command } => write!(f, "run '{command}'"),
            other => f.write_str(other.kind_name()),
        }
    }
}

/// Execute one action against the session.
///
/// RPC kinds perform exactly one backend call; `ToggleFilter` is the one
/// read-modify-write and is kept atomic by the session. `Unbound` is a
/// no-op here so the caller decides how loudly to report it.
///
/// # Errors
/// Returns `PadError` if the backend call or local launch fails.
pub async fn execute(action: &ActionKind, session: &RemoteSession) -> Result<()> {
    match action {
        ActionKind::Unbound => Ok(()),
        ActionKind::SetScene { scene } => {
            info!("switching to scene '{scene}'");
            session.call(RemoteOp::SetScene(scene)).await
        }
        ActionKind::ToggleMic => {
            info!("toggling mic mute");
            session.call(RemoteOp::ToggleMic).await
        }
        ActionKind::StartRecording => session.call(RemoteOp::StartRecording).await,
        ActionKind::StopRecording => session.call(RemoteOp::StopRecording).await,
        ActionKind::ToggleRecording => session.call(RemoteOp::ToggleRecording).await,
        ActionKind::StartStreaming => session.call(RemoteOp::StartStreaming).await,
        ActionKind::StopStreaming => session.call(RemoteOp::StopStreaming).await,
        ActionKind::ToggleStreaming => session.call(RemoteOp::ToggleStreaming).await,
        ActionKind::ToggleFilter { source, filter } => {
            let enabled = session.toggle_filter(source, filter).await?;
            info!("filter '{filter}' on '{source}' now {}", on_off(enabled));
            Ok(())
        }
        ActionKind::RunProgram { command } => {
            info!("launching: {command}");
            program::spawn_detached(command)
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
