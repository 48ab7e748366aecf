// src/render/preview.rs

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::debug;

use crate::error::Result;
use crate::render::raycast::SoftwareRenderer;
use crate::render::transfer::TransferFunctions;
use crate::render::{FrameView, VolumeRenderer};

/// Interactive stand-in for a window: every rendered frame overwrites one PNG.
///
/// Cancellation requests arrive through a channel that is drained once per
/// `event_pending` call.
pub struct PreviewRenderer {
    inner: SoftwareRenderer,
    preview_path: PathBuf,
    events: Option<Receiver<()>>,
}

impl PreviewRenderer {
    pub fn new(inner: SoftwareRenderer, preview_path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            preview_path: preview_path.into(),
            events: None,
        }
    }

    /// Attaches the channel whose messages request cancellation.
    pub fn with_events(mut self, events: Receiver<()>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn preview_path(&self) -> &Path {
        &self.preview_path
    }
}

impl VolumeRenderer for PreviewRenderer {
    fn set_transfer_functions(&mut self, transfer: &TransferFunctions) {
        self.inner.set_transfer_functions(transfer);
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<()> {
        self.inner.render(frame)?;
        let path = self.preview_path.clone();
        self.inner.capture(&path)
    }

    fn capture(&mut self, path: &Path) -> Result<()> {
        self.inner.capture(path)
    }

    fn event_pending(&mut self) -> bool {
        let Some(events) = &self.events else {
            return false;
        };
        match events.try_recv() {
            Ok(()) => true,
            // A closed input stream is not a request to stop.
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        }
    }
}

/// Spawns a thread that sends one event per line read from stdin.
pub fn stdin_events() -> Receiver<()> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            if line.is_err() || sender.send(()).is_err() {
                break;
            }
        }
        debug!("stdin event thread finished");
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderSettings;

    #[test]
    fn channel_message_requests_cancellation() {
        let (sender, receiver) = mpsc::channel();
        let mut renderer = PreviewRenderer::new(
            SoftwareRenderer::new(RenderSettings::default()),
            "unused.png",
        )
        .with_events(receiver);

        assert!(!renderer.event_pending());
        sender.send(()).unwrap();
        assert!(renderer.event_pending());
        drop(sender);
        assert!(!renderer.event_pending());
    }

    #[test]
    fn without_channel_nothing_is_pending() {
        let mut renderer =
            PreviewRenderer::new(SoftwareRenderer::new(RenderSettings::default()), "unused.png");
        assert!(!renderer.event_pending());
        assert_eq!(renderer.preview_path(), Path::new("unused.png"));
    }
}

// src/render/preview.rs
