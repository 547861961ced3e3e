//! Window-level drag gesture tracking.
//!
//! Enter/leave fire once per element boundary crossed, so the tracker keeps a
//! nesting count and only flips `active` on the 0→1 and 1→0 transitions.

use crate::extractor::{extract_url, DropPayload};
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Leave,
    Over,
    Drop(DropPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragSession {
    pub nesting: u32,
    pub active: bool,
}

/// What the host should do with the native event after the tracker saw it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragOutcome {
    pub prevent_default: bool,
    pub dropped_url: Option<String>,
}

#[derive(Debug)]
pub struct DragTracker {
    session: DragSession,
    active_tx: watch::Sender<bool>,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DragTracker {
    pub fn new() -> Self {
        let (active_tx, _) = watch::channel(false);
        Self {
            session: DragSession::default(),
            active_tx,
        }
    }

    pub fn session(&self) -> DragSession {
        self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    /// Observes the drag-active flag, e.g. to show the drop overlay.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.active_tx.subscribe()
    }

    pub fn handle(&mut self, event: DragEvent) -> DragOutcome {
        match event {
            DragEvent::Enter => {
                self.session.nesting += 1;
                if self.session.nesting == 1 {
                    self.set_active(true);
                }
                DragOutcome::default()
            }
            DragEvent::Leave => {
                match self.session.nesting {
                    0 => debug!("drag leave without matching enter"),
                    1 => {
                        self.session.nesting = 0;
                        self.set_active(false);
                    }
                    _ => self.session.nesting -= 1,
                }
                DragOutcome::default()
            }
            DragEvent::Over => DragOutcome {
                prevent_default: true,
                dropped_url: None,
            },
            DragEvent::Drop(payload) => {
                self.session.nesting = 0;
                self.set_active(false);
                let dropped_url = extract_url(&payload);
                if dropped_url.is_none() {
                    debug!("drop carried no usable url");
                }
                DragOutcome {
                    prevent_default: true,
                    dropped_url,
                }
            }
        }
    }

    fn set_active(&mut self, active: bool) {
        self.session.active = active;
        self.active_tx.send_if_modified(|current| {
            let changed = *current != active;
            *current = active;
            changed
        });
        debug!(active, "drag state changed");
    }
}
