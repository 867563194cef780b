use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::debug;

use crate::session::{SessionPhase, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    Placeholder,
    Content,
}

pub struct SessionBootstrap {
    session: Arc<SessionStore>,
    started: AtomicBool,
    released: AtomicBool,
}

impl SessionBootstrap {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            started: AtomicBool::new(false),
            released: AtomicBool::new(false),
        }
    }

    /// Runs the session bootstrap on the first call only.
    ///
    /// Returns the settled phase for the call that ran it and `None` for every
    /// later call; use [`ready`](Self::ready) to wait for the first one.
    pub async fn mount(&self) -> Option<SessionPhase> {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("session bootstrap already dispatched");
            return None;
        }
        Some(self.session.bootstrap().await)
    }

    /// Once content has been shown it stays shown, whatever the session does later.
    pub fn view(&self) -> GateView {
        if self.released.load(Ordering::SeqCst) {
            return GateView::Content;
        }
        if self.session.snapshot().is_initialized {
            self.released.store(true, Ordering::SeqCst);
            GateView::Content
        } else {
            GateView::Placeholder
        }
    }

    pub async fn ready(&self) {
        let mut state = self.session.subscribe();
        if state.wait_for(|s| s.is_initialized).await.is_ok() {
            self.released.store(true, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
#[path = "tests/bootstrap_tests.rs"]
mod tests;
