//! In-process collaborators for headless runs and tests.
//!
//! [`SimSpeech`] and [`SimRender`] record what the session hands them.
//! [`SimScanner`] serves queued position codes, one per scan, and logs every
//! call so tests can check the start/stop/clear order.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use wayfinder_guidance::Language;
use wayfinder_types::WayError;

use crate::collaborators::{RenderFrame, RenderSink, ScanConfig, ScanSource, SpeechSink};

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ────────────────────────────────────────────────────────────────────────────
// Speech
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SimSpeech {
    spoken: Mutex<Vec<String>>,
}

impl SimSpeech {
    /// Texts spoken so far, oldest first.
    pub fn spoken(&self) -> Vec<String> {
        locked(&self.spoken).clone()
    }
}

impl SpeechSink for SimSpeech {
    fn speak(&self, text: &str, _language: Language) {
        locked(&self.spoken).push(text.to_string());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SimRender {
    frames: Mutex<Vec<RenderFrame>>,
}

impl SimRender {
    pub fn last(&self) -> Option<RenderFrame> {
        locked(&self.frames).last().cloned()
    }

    pub fn count(&self) -> usize {
        locked(&self.frames).len()
    }
}

impl RenderSink for SimRender {
    fn render(&self, frame: &RenderFrame) {
        locked(&self.frames).push(frame.clone());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scanner
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanCall {
    Start,
    Stop,
    Clear,
}

/// A scanner that decodes queued codes.
///
/// An empty queue yields a stream that never produces anything, so the
/// caller's timeout decides.
#[derive(Debug, Default)]
pub struct SimScanner {
    codes: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ScanCall>>,
    failure: Option<String>,
}

impl SimScanner {
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: Mutex::new(codes.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    /// A scanner whose camera never starts.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Queue a code for the next scan.
    pub fn push(&self, code: impl Into<String>) {
        locked(&self.codes).push_back(code.into());
    }

    pub fn calls(&self) -> Vec<ScanCall> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl ScanSource for SimScanner {
    async fn start(&self, _config: &ScanConfig) -> Result<BoxStream<'static, String>, WayError> {
        locked(&self.calls).push(ScanCall::Start);
        if let Some(reason) = &self.failure {
            return Err(WayError::Scanner(reason.clone()));
        }
        Ok(match locked(&self.codes).pop_front() {
            Some(code) => stream::iter([code]).boxed(),
            None => stream::pending::<String>().boxed(),
        })
    }

    async fn stop(&self) -> Result<(), WayError> {
        locked(&self.calls).push(ScanCall::Stop);
        Ok(())
    }

    async fn clear(&self) -> Result<(), WayError> {
        locked(&self.calls).push(ScanCall::Clear);
        Ok(())
    }
}
