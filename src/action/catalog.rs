use super::ActionKind;
use crate::error::{PadError, Result};

/// One selectable action kind, for presentation in a picker.
#[derive(Debug, Clone, Copy)]
pub struct ActionTemplate {
    /// Stable tag, matches [`ActionKind::kind_name`].
    pub kind: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Names of the parameters the kind requires.
    pub params: &'static [&'static str],
}

/// The static list of selectable action kinds.
pub const TEMPLATES: &[ActionTemplate] = &[
    ActionTemplate { kind: "set_scene", label: "Set Scene", params: &["scene"] },
    ActionTemplate { kind: "toggle_mic", label: "Toggle Mic", params: &[] },
    ActionTemplate { kind: "start_recording", label: "Start Recording", params: &[] },
    ActionTemplate { kind: "stop_recording", label: "Stop Recording", params: &[] },
    ActionTemplate { kind: "toggle_recording", label: "Toggle Recording", params: &[] },
    ActionTemplate { kind: "start_streaming", label: "Start Streaming", params: &[] },
    ActionTemplate { kind: "stop_streaming", label: "Stop Streaming", params: &[] },
    ActionTemplate { kind: "toggle_streaming", label: "Toggle Streaming", params: &[] },
    ActionTemplate {
        kind: "toggle_filter",
        label: "Toggle Filter",
        params: &["source", "filter"],
    },
    ActionTemplate { kind: "run_program", label: "Run Program", params: &["command"] },
];

/// Convenience aliases accepted as a `run_program` command and resolved
/// to a full command line at build time. Purely a lookup; the resolved
/// command is what gets stored.
const PROGRAM_ALIASES: &[(&str, &str)] = &[
    ("obs", "obs"),
    ("mixer", "pavucontrol"),
    ("terminal", "x-terminal-emulator"),
];

/// Raw user-supplied parameters for [`build`].
#[derive(Debug, Clone, Default)]
pub struct ActionParams {
    pub scene: Option<String>,
    pub command: Option<String>,
    pub source: Option<String>,
    pub filter: Option<String>,
}

/// Build a fully parameterized action from a kind tag and raw params.
///
/// # Errors
/// Returns `PadError::Validation` when the tag is unknown or a required
/// parameter is missing or empty. Nothing is mutated on failure.
pub fn build(kind: &str, params: ActionParams) -> Result<ActionKind> {
    match kind {
        "set_scene" => Ok(ActionKind::SetScene {
            scene: required(params.scene, "scene")?,
        }),
        "toggle_mic" => Ok(ActionKind::ToggleMic),
        "start_recording" => Ok(ActionKind::StartRecording),
        "stop_recording" => Ok(ActionKind::StopRecording),
        "toggle_recording" => Ok(ActionKind::ToggleRecording),
        "start_streaming" => Ok(ActionKind::StartStreaming),
        "stop_streaming" => Ok(ActionKind::StopStreaming),
        "toggle_streaming" => Ok(ActionKind::ToggleStreaming),
        "toggle_filter" => Ok(ActionKind::ToggleFilter {
            source: required(params.source, "source")?,
            filter: required(params.filter, "filter")?,
        }),
        "run_program" => {
            let command = required(params.command, "command")?;
            Ok(ActionKind::RunProgram {
                command: resolve_alias(&command),
            })
        }
        "unbound" => Ok(ActionKind::Unbound),
        other => Err(PadError::Validation(format!("unknown action kind '{other}'"))),
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PadError::Validation(format!("missing required parameter '{name}'"))),
    }
}

fn resolve_alias(command: &str) -> String {
    PROGRAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == command.trim())
        .map_or_else(|| command.to_string(), |(_, full)| (*full).to_string())
}
