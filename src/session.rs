//! Current user and the logout confirmation flow.

use crate::navigation::{Navigator, Route};

pub const DEFAULT_ROLE: &str = "Dentista";

/// Who is signed in, as shown in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
    pub role: String,
}

impl CurrentUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: DEFAULT_ROLE.to_string(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Uppercased first character of the email, for the avatar badge
    pub fn initial(&self) -> Option<char> {
        self.email.chars().next().map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Authentication collaborator: who is signed in, and how to sign out.
pub trait AuthSession {
    fn current_user(&self) -> Option<&CurrentUser>;
    fn logout(&mut self);
}

/// Session held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct LocalSession {
    user: Option<CurrentUser>,
}

impl LocalSession {
    pub fn new(user: Option<CurrentUser>) -> Self {
        Self { user }
    }
}

impl AuthSession for LocalSession {
    fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    fn logout(&mut self) {
        if self.user.take().is_some() {
            tracing::info!("session closed");
        }
    }
}

/// Two-step logout: ask, then confirm or cancel.
#[derive(Debug, Clone, Default)]
pub struct LogoutFlow {
    pending: bool,
}

impl LogoutFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Open the confirmation
    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Sign out and head to the login route. Does nothing unless a
    /// confirmation is pending.
    pub fn confirm(&mut self, auth: &mut dyn AuthSession, navigator: &mut dyn Navigator) -> bool {
        if !self.pending {
            return false;
        }
        auth.logout();
        navigator.navigate(Route::Login);
        self.pending = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Router;
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<&'static str>>>;

    /// Records calls from either role into one shared log.
    struct Recorder {
        calls: CallLog,
    }

    impl AuthSession for Recorder {
        fn current_user(&self) -> Option<&CurrentUser> {
            None
        }

        fn logout(&mut self) {
            self.calls.borrow_mut().push("logout");
        }
    }

    impl Navigator for Recorder {
        fn navigate(&mut self, route: Route) {
            assert_eq!(route, Route::Login);
            self.calls.borrow_mut().push("navigate");
        }
    }

    #[test]
    fn confirm_logs_out_then_navigates() {
        let calls = CallLog::default();
        let mut flow = LogoutFlow::new();
        let mut auth = Recorder { calls: Rc::clone(&calls) };
        let mut nav = Recorder { calls: Rc::clone(&calls) };
        flow.request();
        assert!(flow.confirm(&mut auth, &mut nav));
        assert_eq!(*calls.borrow(), ["logout", "navigate"]);
        assert!(!flow.is_pending());
    }

    #[test]
    fn confirm_without_request_does_nothing() {
        let calls = CallLog::default();
        let mut auth = Recorder { calls: Rc::clone(&calls) };
        let mut nav = Recorder { calls: Rc::clone(&calls) };
        assert!(!LogoutFlow::new().confirm(&mut auth, &mut nav));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn cancel_keeps_the_session() {
        let mut flow = LogoutFlow::new();
        let mut session = LocalSession::new(Some(CurrentUser::new("dra@claudent.mx")));
        let mut router = Router::default();

        flow.request();
        flow.cancel();
        assert!(!flow.confirm(&mut session, &mut router));
        assert!(session.current_user().is_some());
        assert_eq!(router.current(), &Route::Dashboard);
    }

    #[test]
    fn local_session_logout_clears_user() {
        let mut flow = LogoutFlow::new();
        let mut session = LocalSession::new(Some(CurrentUser::new("dra@claudent.mx")));
        let mut router = Router::default();
        flow.request();
        flow.confirm(&mut session, &mut router);
        assert!(session.current_user().is_none());
        assert_eq!(router.current(), &Route::Login);
    }

    #[test]
    fn initial_is_uppercased() {
        assert_eq!(CurrentUser::new("ana@x.mx").initial(), Some('A'));
        assert_eq!(CurrentUser::new("").initial(), None);
        assert_eq!(CurrentUser::new("b@x.mx").with_role("Asistente").role, "Asistente");
    }
}
