//! Bridges callback-style user resolution into a future
//!
//! Engagement SDKs commonly hand back the current user through a callback
//! that may fire synchronously or later on an SDK-owned thread. Sink
//! implementations wrap such an API with [`resolve_with_callback`] to
//! satisfy [`BrazeSink::current_user`](crate::sink::BrazeSink::current_user).

use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Completion handle passed to a callback-style resolver
///
/// Both completions consume the handle, so it can answer at most once.
#[derive(Debug)]
pub struct UserCallback<U> {
    sender: oneshot::Sender<Option<U>>,
}

impl<U> UserCallback<U> {
    pub fn on_success(self, user: U) {
        if self.sender.send(Some(user)).is_err() {
            debug!("Current user resolved after the caller stopped waiting");
        }
    }

    pub fn on_error(self) {
        let _ = self.sender.send(None);
    }
}

/// Runs `register` with a fresh [`UserCallback`] and waits for its answer
///
/// Resolves to `None` when the callback reports an error or is dropped
/// without answering. The calling thread is never blocked.
pub async fn resolve_with_callback<U, F>(register: F) -> Option<U>
where
    F: FnOnce(UserCallback<U>),
{
    let (sender, receiver) = oneshot::channel();
    register(UserCallback { sender });

    match receiver.await {
        Ok(user) => user,
        Err(_) => {
            warn!("Current user callback was dropped without an answer");
            None
        }
    }
}
