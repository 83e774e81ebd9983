//! [`ScanCoordinator`] – one position code per scan.
//!
//! A scan starts the camera, waits for the first decoded string (or the
//! timeout), then stops and clears the scanner.  A scanner left running by
//! an earlier scan is stopped and cleared before the next start.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tracing::{debug, info, warn};
use wayfinder_types::{Route, WayError};

use crate::collaborators::{ScanConfig, ScanSource};
use crate::handle::SessionHandle;

pub struct ScanCoordinator {
    source: Arc<dyn ScanSource>,
    config: ScanConfig,
    running: bool,
}

impl ScanCoordinator {
    pub fn new(source: Arc<dyn ScanSource>, config: ScanConfig) -> Self {
        Self {
            source,
            config,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Scan once.  `Ok(None)` when the stream ended or timed out without a
    /// decode.
    pub async fn scan_once(&mut self) -> Result<Option<String>, WayError> {
        self.shutdown().await?;

        let mut stream = self.source.start(&self.config).await?;
        self.running = true;
        debug!(fps = self.config.frames_per_second, "scanner started");

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let decoded = match tokio::time::timeout(timeout, stream.next()).await {
            Ok(code) => code,
            Err(_) => {
                warn!(timeout_ms = self.config.timeout_ms, "scan timed out");
                None
            }
        };
        drop(stream);
        self.shutdown().await?;
        Ok(decoded)
    }

    /// Scan once and relocalize the session at the decoded position.
    ///
    /// `Ok(None)` when nothing was decoded; relocalization errors are
    /// returned as-is and leave the session unchanged.
    pub async fn scan_and_relocalize(&mut self, session: &SessionHandle) -> Result<Option<Route>, WayError> {
        let Some(code) = self.scan_once().await? else {
            return Ok(None);
        };
        info!(code = %code, "position code scanned");
        session
            .with(|s| s.relocalize(&code).map(|route| Some(route.clone())))
            .await
    }

    async fn shutdown(&mut self) -> Result<(), WayError> {
        if self.running {
            self.source.stop().await?;
            self.source.clear().await?;
            self.running = false;
        }
        Ok(())
    }
}
