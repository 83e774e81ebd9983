//! [`SessionHandle`] – shared, serialized access to one session.
//!
//! Step events, heading checks, explicit advances and relocalization may
//! come from different tasks.  All of them take the same lock, so a
//! relocalization swaps route and progress without any other mutation in
//! between.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::session::NavigationSession;

#[derive(Clone)]
pub struct SessionHandle(Arc<Mutex<NavigationSession>>);

impl SessionHandle {
    pub fn new(session: NavigationSession) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, NavigationSession> {
        self.0.lock().await
    }

    /// Run `f` with exclusive access and return its result.
    pub async fn with<R>(&self, f: impl FnOnce(&mut NavigationSession) -> R) -> R {
        let mut session = self.0.lock().await;
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{RenderSink, SpeechSink};
    use crate::config::EngineConfig;
    use crate::sim::{SimRender, SimSpeech};
    use wayfinder_map::{BLOCK_C_MAP, Graph};
    use wayfinder_middleware::EventBus;
    use wayfinder_tracking::ProgressState;

    fn handle() -> SessionHandle {
        let graph = Arc::new(Graph::from_json(BLOCK_C_MAP).unwrap());
        SessionHandle::new(NavigationSession::new(
            graph,
            EngineConfig::default(),
            Arc::new(SimSpeech::default()) as Arc<dyn SpeechSink>,
            Arc::new(SimRender::default()) as Arc<dyn RenderSink>,
            EventBus::default(),
        ))
    }

    #[tokio::test]
    async fn concurrent_steps_and_relocalization_stay_consistent() {
        let handle = handle();
        handle
            .with(|s| s.navigate("c201", "c214").map(|_| ()))
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let h = handle.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..10 {
                    h.with(|s| s.step()).await;
                    tokio::task::yield_now().await;
                }
            }));
        }
        let h = handle.clone();
        let reloc = tokio::spawn(async move { h.with(|s| s.relocalize("c210").map(|r| r.path.len())).await });
        for t in tasks {
            t.await.unwrap();
        }
        assert_eq!(reloc.await.unwrap(), Ok(4));

        let session = handle.lock().await;
        let route = session.route().unwrap();
        assert_eq!(route.path.last().map(|n| n.as_str()), Some("c214"));
        if let Some(ProgressState::Active { segment, distance }) = session.state() {
            assert!(segment < route.last_index());
            assert!(distance <= route.segment_length(segment).unwrap());
        }
    }
}
