use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::protocol::UserProfile;
use tracing::info;

type InvalidationHook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
}

pub struct Session {
    state: Mutex<SessionState>,
    on_invalidate: Option<InvalidationHook>,
}

impl Session {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SessionState::default()),
            on_invalidate: None,
        })
    }

    pub fn with_invalidation(hook: impl Fn() + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SessionState::default()),
            on_invalidate: Some(Box::new(hook)),
        })
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sign_in(&self, token: impl Into<String>, user: Option<UserProfile>) {
        let mut state = self.state();
        state.token = Some(token.into());
        state.user = user;
    }

    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().token.is_some()
    }

    /// Clears the session. The hook fires only when a token was present, so
    /// a burst of rejected calls redirects once.
    pub fn invalidate(&self) -> bool {
        let was_active = {
            let mut state = self.state();
            let was_active = state.token.take().is_some();
            state.user = None;
            was_active
        };
        if was_active {
            info!("session invalidated; redirecting to login");
            if let Some(hook) = &self.on_invalidate {
                hook();
            }
        }
        was_active
    }
}
