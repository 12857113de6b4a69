use crate::session::Session;
use crate::views::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authorized,
    Redirect(Route),
}

/// Gate in front of protected views. Only the presence of a token is checked,
/// once per mount; expiry and 401s are not its concern.
#[derive(Debug)]
pub struct SessionGuard {
    state: GuardState,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        SessionGuard {
            state: GuardState::Checking,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn check(&mut self, session: &Session) -> GuardState {
        if self.state == GuardState::Checking {
            self.state = if session.is_authenticated() {
                GuardState::Authorized
            } else {
                GuardState::Redirect(Route::Login)
            };
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_checking() {
        assert_eq!(SessionGuard::new().state(), GuardState::Checking);
    }

    #[test]
    fn test_token_authorizes() {
        let session = Session::in_memory();
        session.set_token("abc").unwrap();
        let mut guard = SessionGuard::new();
        assert_eq!(guard.check(&session), GuardState::Authorized);
    }

    #[test]
    fn test_missing_token_redirects_to_login() {
        let session = Session::in_memory();
        let mut guard = SessionGuard::new();
        assert_eq!(guard.check(&session), GuardState::Redirect(Route::Login));
    }

    #[test]
    fn test_empty_token_redirects_to_login() {
        let session = Session::in_memory();
        session.set_token("").unwrap();
        let mut guard = SessionGuard::new();
        assert_eq!(guard.check(&session), GuardState::Redirect(Route::Login));
    }

    #[test]
    fn test_decision_is_made_once_per_mount() {
        let session = Session::in_memory();
        let mut guard = SessionGuard::new();
        guard.check(&session);
        session.set_token("late").unwrap();
        assert_eq!(guard.check(&session), GuardState::Redirect(Route::Login));

        let mut guard = SessionGuard::new();
        assert_eq!(guard.check(&session), GuardState::Authorized);
        session.clear().unwrap();
        assert_eq!(guard.check(&session), GuardState::Authorized);
    }
}
