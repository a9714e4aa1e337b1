use crate::action::{self, catalog, ActionKind};
use crate::bindings::BindingStore;
use crate::config;
use crate::error::Result;
use crate::event::PadEvent;
use crate::keys::KeyId;
use crate::session::RemoteSession;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Resolves triggers to bound actions and executes them.
///
/// Built to survive arbitrary per-trigger failures: every outcome is
/// logged and nothing on the trigger path can take the dispatcher down.
/// Callable from concurrent contexts; the binding table and the session
/// each carry their own serialization.
pub struct Dispatcher {
    bindings: Arc<BindingStore>,
    session: Arc<RemoteSession>,
    /// Where bindings are persisted after a successful assignment.
    /// `None` disables persistence.
    config_path: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(
        bindings: Arc<BindingStore>,
        session: Arc<RemoteSession>,
        config_path: Option<PathBuf>,
    ) -> Self {
        Self {
            bindings,
            session,
            config_path,
        }
    }

    /// Execute whatever is bound to `key`. Never fails; failures are
    /// reported and the trigger abandoned.
    pub async fn trigger(&self, key: KeyId) {
        let action = self.bindings.get(key);
        if action == ActionKind::Unbound {
            debug!("{key}: no action assigned");
            return;
        }
        match action::execute(&action, &self.session).await {
            Ok(()) => info!("{key}: {action}: ok"),
            Err(e) => warn!("{key}: {action}: {e}"),
        }
    }

    /// Bind an action to a key and persist the store.
    ///
    /// Validation failures surface before anything is stored. A save
    /// failure is reported but does not roll back the in-memory binding.
    ///
    /// # Errors
    /// Returns `PadError::Validation` from [`catalog::build`].
    pub fn assign(
        &self,
        key: KeyId,
        kind: &str,
        params: catalog::ActionParams,
    ) -> Result<ActionKind> {
        let action = catalog::build(kind, params)?;
        self.bindings.set(key, action.clone());
        info!("{key} bound to {action}");
        self.persist();
        Ok(action)
    }

    /// Reset a key to `Unbound` and persist the store.
    pub fn unassign(&self, key: KeyId) {
        self.bindings.set(key, ActionKind::Unbound);
        info!("{key} unbound");
        self.persist();
    }

    fn persist(&self) {
        if let Some(path) = &self.config_path {
            if let Err(e) = config::save(&self.bindings, path) {
                warn!("could not save {}: {e}", path.display());
            }
        }
    }

    /// Consume the intake channel until shutdown, then tear the session
    /// down. Triggers are handled one at a time in arrival order.
    pub async fn run(
        self: Arc<Self>,
        mut rx: mpsc::Receiver<PadEvent>,
        cancel: CancellationToken,
    ) {
        info!("dispatcher running");
        loop {
            let event = tokio::select! {
                () = cancel.cancelled() => break,
                () = async { tokio::signal::ctrl_c().await.ok(); } => {
                    info!("received SIGINT, shutting down");
                    break;
                }
                event = rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            match event {
                PadEvent::Trigger { key, at } => {
                    debug!("{key} triggered ({:?} ago)", at.elapsed());
                    self.trigger(key).await;
                }
                PadEvent::Shutdown => break,
            }
        }

        cancel.cancel();
        self.session.disconnect().await;
        info!("dispatcher stopped");
    }
}
