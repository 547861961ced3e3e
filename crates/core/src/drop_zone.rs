use crate::drag::{DragEvent, DragTracker};
use crate::ingest::{IngestCoordinator, IngestHandle};
use crate::traits::ArtifactBackend;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// A live registration of the drop target on a window's drag event stream.
///
/// Dropping the zone (or calling [`DropZone::detach`]) stops listening and
/// aborts the ingestions it started. When the event stream itself closes, the
/// listener lets in-flight ingestions finish before exiting.
pub struct DropZone {
    listener: Option<JoinHandle<()>>,
    active: watch::Receiver<bool>,
}

struct InFlight(Vec<IngestHandle>);

impl Drop for InFlight {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

impl DropZone {
    /// Must be called from within a tokio runtime.
    pub fn attach<B>(
        mut events: mpsc::Receiver<DragEvent>,
        mut tracker: DragTracker,
        coordinator: IngestCoordinator<B>,
    ) -> Self
    where
        B: ArtifactBackend + Send + Sync + 'static,
    {
        let active = tracker.subscribe();

        let listener = tokio::spawn(async move {
            let mut in_flight = InFlight(Vec::new());

            while let Some(event) = events.recv().await {
                let outcome = tracker.handle(event);
                if let Some(url) = outcome.dropped_url {
                    in_flight.0.retain(|handle| !handle.is_finished());
                    in_flight.0.push(coordinator.on_url_dropped(url));
                }
            }

            debug!(
                in_flight = in_flight.0.len(),
                "drag event stream closed, settling ingestions"
            );
            for handle in in_flight.0.iter_mut() {
                handle.settle().await;
            }
        });

        Self {
            listener: Some(listener),
            active,
        }
    }

    /// Drag-active flag; drives the drop overlay.
    pub fn active(&self) -> watch::Receiver<bool> {
        self.active.clone()
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Waits for the event stream to close and its ingestions to settle.
    pub async fn join(mut self) {
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }
    }

    pub fn detach(self) {}
}

impl Drop for DropZone {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}
