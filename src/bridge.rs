use crate::event::PadEvent;
use crate::keys::KeyId;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Read key labels from stdin and push trigger events onto the intake
/// channel, one per line (`key7`, `enc1`, ...).
///
/// This is the in-tree stand-in for a hotkey bridge: trigger sources
/// talk to the dispatcher only through the channel, never by calling
/// into shared state from their own context.
pub async fn read_stdin(tx: mpsc::Sender<PadEvent>, cancel: CancellationToken) {
    info!("stdin bridge ready (type a key label, e.g. 'key7')");
    read_lines(BufReader::new(tokio::io::stdin()), tx, cancel).await;
    info!("stdin bridge stopped");
}

async fn read_lines<R>(reader: R, tx: mpsc::Sender<PadEvent>, cancel: CancellationToken)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            () = cancel.cancelled() => return,
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                // A closed source (stdin at /dev/null under a service
                // manager) must not drop the intake sender and take the
                // daemon down with it; park until shutdown.
                Ok(None) | Err(_) => {
                    debug!("input closed, bridge parked until shutdown");
                    cancel.cancelled().await;
                    return;
                }
            },
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.parse::<KeyId>() {
            Ok(key) => {
                let event = PadEvent::Trigger { key, at: Instant::now() };
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            Err(e) => warn!("{e}"),
        }
    }
}
