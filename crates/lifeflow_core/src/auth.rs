//! Authentication state and subscription.
//!
//! # Responsibility
//! - Track the signed-in user together with a loading flag.
//! - Notify subscribers whenever that state changes.
//! - Provide a parameterless `login()` for the configured local profile.
//!
//! # Invariants
//! - A subscriber receives the current state immediately on `subscribe`.
//! - Listeners may subscribe/unsubscribe from inside a callback; the
//!   listener list is snapshotted before dispatch.

use crate::config::LocalUserConfig;
use crate::model::user::User;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{error, info};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Snapshot delivered to auth subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl AuthState {
    pub fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            is_loading: false,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_loading: false,
        }
    }
}

/// Handle returned by `subscribe`, used to stop notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type AuthListener = Rc<dyn Fn(&AuthState)>;

#[derive(Debug)]
pub enum AuthError {
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "auth storage failure: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Source of the current-user/loading state.
pub trait AuthProvider {
    fn state(&self) -> AuthState;
    fn subscribe(&self, listener: AuthListener) -> SubscriptionId;
    /// Returns `false` when the id was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
    fn login(&self) -> Result<User, AuthError>;
    fn logout(&self) -> Result<(), AuthError>;
}

/// Auth provider backed by the local user table and a persisted session.
pub struct LocalAuthProvider<R: UserRepository> {
    repo: R,
    profile: LocalUserConfig,
    state: RefCell<AuthState>,
    listeners: RefCell<Vec<(SubscriptionId, AuthListener)>>,
    next_id: Cell<u64>,
}

impl<R: UserRepository> LocalAuthProvider<R> {
    /// Creates a provider in the loading state; call `restore_session` next.
    pub fn new(repo: R, profile: LocalUserConfig) -> Self {
        Self {
            repo,
            profile,
            state: RefCell::new(AuthState::loading()),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Resolves the loading state from the persisted session.
    pub fn restore_session(&self) -> Result<AuthState, AuthError> {
        match self.repo.session_user() {
            Ok(user) => {
                let next = match user {
                    Some(user) => AuthState::signed_in(user),
                    None => AuthState::signed_out(),
                };
                info!(
                    "event=auth_restore module=auth status=ok signed_in={}",
                    next.user.is_some()
                );
                self.publish(next.clone());
                Ok(next)
            }
            Err(err) => {
                error!("event=auth_restore module=auth status=error error={err}");
                self.publish(AuthState::signed_out());
                Err(err.into())
            }
        }
    }

    fn publish(&self, next: AuthState) {
        *self.state.borrow_mut() = next.clone();
        let listeners: Vec<AuthListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&next);
        }
    }

    fn find_or_create_profile(&self) -> Result<User, AuthError> {
        if let Some(user) = self.repo.find_user_by_email(&self.profile.email)? {
            return Ok(user);
        }
        let user = User::new(self.profile.email.clone(), self.profile.display_name.clone());
        Ok(self.repo.create_user(&user)?)
    }
}

impl<R: UserRepository> AuthProvider for LocalAuthProvider<R> {
    fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn subscribe(&self, listener: AuthListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, Rc::clone(&listener)));
        let current = self.state();
        listener(&current);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn login(&self) -> Result<User, AuthError> {
        self.publish(AuthState::loading());

        let result = self
            .find_or_create_profile()
            .and_then(|user| {
                self.repo.save_session(user.id)?;
                Ok(user)
            });

        match result {
            Ok(user) => {
                info!("event=auth_login module=auth status=ok user_id={}", user.id);
                self.publish(AuthState::signed_in(user.clone()));
                Ok(user)
            }
            Err(err) => {
                error!("event=auth_login module=auth status=error error={err}");
                self.publish(AuthState::signed_out());
                Err(err)
            }
        }
    }

    fn logout(&self) -> Result<(), AuthError> {
        self.repo.clear_session()?;
        info!("event=auth_logout module=auth status=ok");
        self.publish(AuthState::signed_out());
        Ok(())
    }
}
