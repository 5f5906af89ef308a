//! Auth guard port
//!
//! Decides whether a caller may invoke a guarded action endpoint.

use thiserror::Error;

/// Identity attached to an incoming action call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Authenticated user id, `None` for anonymous calls
    pub uid: Option<String>,
    pub experimenter: bool,
}

impl CallerIdentity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn participant(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            experimenter: false,
        }
    }

    pub fn experimenter(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            experimenter: true,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

pub trait AuthGuard: Send + Sync {
    fn authorize(&self, caller: &CallerIdentity) -> Result<(), AuthError>;
}

/// Lets every caller through
pub struct AllowAllGuard;

impl AuthGuard for AllowAllGuard {
    fn authorize(&self, _caller: &CallerIdentity) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Requires an authenticated experimenter
pub struct ExperimenterGuard;

impl AuthGuard for ExperimenterGuard {
    fn authorize(&self, caller: &CallerIdentity) -> Result<(), AuthError> {
        match &caller.uid {
            None => Err(AuthError::Unauthenticated),
            Some(_) if caller.experimenter => Ok(()),
            Some(uid) => Err(AuthError::PermissionDenied(format!(
                "{uid} is not an experimenter"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experimenter_guard() {
        let guard = ExperimenterGuard;
        assert_eq!(
            guard.authorize(&CallerIdentity::anonymous()),
            Err(AuthError::Unauthenticated)
        );
        assert!(matches!(
            guard.authorize(&CallerIdentity::participant("u1")),
            Err(AuthError::PermissionDenied(_))
        ));
        assert!(guard.authorize(&CallerIdentity::experimenter("u2")).is_ok());
    }

    #[test]
    fn test_allow_all_guard() {
        assert!(AllowAllGuard.authorize(&CallerIdentity::anonymous()).is_ok());
    }
}
