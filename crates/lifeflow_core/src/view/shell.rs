//! Tab navigation bound to the auth subscription.

use super::dashboard::DashboardView;
use super::goals::GoalsView;
use super::habits::HabitsView;
use super::progress::ProgressView;
use super::tasks::TasksView;
use super::{Notice, Services};
use crate::auth::{AuthProvider, AuthState, SubscriptionId};
use crate::model::user::User;
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Dashboard,
    Tasks,
    Habits,
    Goals,
    Progress,
}

impl Tab {
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Tasks,
        Self::Habits,
        Self::Goals,
        Self::Progress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Tasks => "tasks",
            Self::Habits => "habits",
            Self::Goals => "goals",
            Self::Progress => "progress",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// What the shell can render for the current auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewGate {
    Loading,
    SignedOut,
    Ready(User),
}

impl From<&AuthState> for ViewGate {
    fn from(state: &AuthState) -> Self {
        match (&state.user, state.is_loading) {
            (_, true) => Self::Loading,
            (None, false) => Self::SignedOut,
            (Some(user), false) => Self::Ready(user.clone()),
        }
    }
}

/// Owns the five views and mirrors the provider's auth state.
///
/// Unsubscribes from the provider on drop.
pub struct Shell<'p, A: AuthProvider + ?Sized> {
    auth: &'p A,
    subscription: SubscriptionId,
    state: Rc<RefCell<AuthState>>,
    active: Tab,
    pub dashboard: DashboardView,
    pub tasks: TasksView,
    pub habits: HabitsView,
    pub goals: GoalsView,
    pub progress: ProgressView,
}

impl<'p, A: AuthProvider + ?Sized> Shell<'p, A> {
    pub fn new(auth: &'p A) -> Self {
        let state = Rc::new(RefCell::new(AuthState::loading()));
        let sink = Rc::clone(&state);
        let subscription = auth.subscribe(Rc::new(move |next: &AuthState| {
            *sink.borrow_mut() = next.clone();
        }));
        Self {
            auth,
            subscription,
            state,
            active: Tab::default(),
            dashboard: DashboardView::new(),
            tasks: TasksView::new(),
            habits: HabitsView::new(),
            goals: GoalsView::new(),
            progress: ProgressView::new(),
        }
    }

    pub fn gate(&self) -> ViewGate {
        ViewGate::from(&*self.state.borrow())
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    /// Switches to `tab` and refreshes it for the signed-in user.
    ///
    /// Returns the user the view was loaded for, or `None` while the auth
    /// state is loading or signed out.
    pub fn activate(&mut self, tab: Tab, services: &Services<'_>) -> Option<User> {
        self.active = tab;
        let ViewGate::Ready(user) = self.gate() else {
            debug!(
                "event=view_activate module=view tab={} status=skipped reason=no_user",
                tab.as_str()
            );
            return None;
        };
        debug!(
            "event=view_activate module=view tab={} status=start",
            tab.as_str()
        );
        match tab {
            Tab::Dashboard => self.dashboard.refresh(services, &user),
            Tab::Tasks => self.tasks.refresh(services, &user),
            Tab::Habits => self.habits.refresh(services, &user),
            Tab::Goals => self.goals.refresh(services, &user),
            Tab::Progress => self.progress.refresh(services, &user),
        }
        Some(user)
    }

    /// Drains pending notices from every view, in tab order.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        let mut all = self.dashboard.notices.drain();
        all.extend(self.tasks.notices.drain());
        all.extend(self.habits.notices.drain());
        all.extend(self.goals.notices.drain());
        all.extend(self.progress.notices.drain());
        all
    }
}

impl<A: AuthProvider + ?Sized> Drop for Shell<'_, A> {
    fn drop(&mut self) {
        self.auth.unsubscribe(self.subscription);
    }
}
