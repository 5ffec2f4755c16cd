//! Admin gate: a password prompt in front of the open/closed toggle.

use super::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminGate {
    #[default]
    Closed,
    CredentialEntry,
    ActionMenu,
}

impl AdminGate {
    pub fn open(&mut self) {
        *self = AdminGate::CredentialEntry;
    }

    pub fn close(&mut self) {
        *self = AdminGate::Closed;
    }

    /// Compares `attempt` with `secret`. An empty secret never matches.
    ///
    /// On mismatch the gate stays in credential entry.
    pub fn submit_password(&mut self, secret: &str, attempt: &str) -> Result<(), AuthError> {
        if *self == AdminGate::Closed {
            return Err(AuthError::NotAuthorized);
        }
        if secret.is_empty() || secret != attempt {
            *self = AdminGate::CredentialEntry;
            return Err(AuthError::WrongPassword);
        }
        *self = AdminGate::ActionMenu;
        Ok(())
    }

    pub fn require_action_menu(&self) -> Result<(), AuthError> {
        match self {
            AdminGate::ActionMenu => Ok(()),
            _ => Err(AuthError::NotAuthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_password_reaches_action_menu() {
        let mut gate = AdminGate::default();
        gate.open();
        assert_eq!(gate, AdminGate::CredentialEntry);
        gate.submit_password("1234", "1234").unwrap();
        assert_eq!(gate, AdminGate::ActionMenu);
        assert!(gate.require_action_menu().is_ok());
        gate.close();
        assert_eq!(gate, AdminGate::Closed);
    }

    #[test]
    fn test_wrong_password_stays_in_entry() {
        let mut gate = AdminGate::default();
        gate.open();
        assert_eq!(gate.submit_password("1234", "0000"), Err(AuthError::WrongPassword));
        assert_eq!(gate, AdminGate::CredentialEntry);
        assert_eq!(gate.require_action_menu(), Err(AuthError::NotAuthorized));
    }

    #[test]
    fn test_empty_secret_never_matches() {
        let mut gate = AdminGate::default();
        gate.open();
        assert_eq!(gate.submit_password("", ""), Err(AuthError::WrongPassword));
        assert_eq!(gate, AdminGate::CredentialEntry);
    }

    #[test]
    fn test_password_requires_open_gate() {
        let mut gate = AdminGate::default();
        assert_eq!(gate.submit_password("1234", "1234"), Err(AuthError::NotAuthorized));
        assert_eq!(gate, AdminGate::Closed);
    }
}
