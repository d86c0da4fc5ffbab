//! Session and role state consumed by the navigation bar.

use serde::{Deserialize, Serialize};

/// Whether the signed-in user is an admin.
///
/// `Unknown` covers a lookup that is still in flight or that failed. Only
/// `Yes` grants admin affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminFlag {
    Yes,
    No,
    #[default]
    Unknown,
}

impl AdminFlag {
    pub fn is_confirmed(self) -> bool {
        self == AdminFlag::Yes
    }
}

impl From<bool> for AdminFlag {
    fn from(is_admin: bool) -> Self {
        if is_admin {
            AdminFlag::Yes
        } else {
            AdminFlag::No
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A signed-in session as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub user: SessionUser,
}

/// Current session plus whether it is still loading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub session: Option<Session>,
    pub is_pending: bool,
}

impl SessionView {
    pub fn pending() -> Self {
        Self {
            session: None,
            is_pending: true,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
            is_pending: false,
        }
    }
}
