use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized caller identity, resolved from the bearer token plus one
/// profile lookup. A request without (or with an unusable) credential
/// resolves to `Identity::anonymous()` rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub user_id: Option<i64>,
    pub is_admin: bool,
    pub email: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            is_admin: false,
            email: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// The caller's access level, consumed uniformly by the content access
/// gate instead of ad hoc role-string comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entitlement {
    Anonymous,
    Reader {
        user_id: i64,
        approved: bool,
        vip: bool,
    },
    /// Authors carry the ids of the novels they own; they may only read
    /// their own works.
    Author {
        user_id: i64,
        novel_ids: Vec<i64>,
        vip: bool,
    },
    Admin {
        user_id: i64,
    },
}

impl Entitlement {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Entitlement::Anonymous => None,
            Entitlement::Reader { user_id, .. }
            | Entitlement::Author { user_id, .. }
            | Entitlement::Admin { user_id } => Some(*user_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Entitlement::Anonymous)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Entitlement::Admin { .. })
    }

    pub fn is_vip(&self) -> bool {
        match self {
            Entitlement::Reader { vip, .. } | Entitlement::Author { vip, .. } => *vip,
            Entitlement::Admin { .. } => true,
            Entitlement::Anonymous => false,
        }
    }

    pub fn owns_novel(&self, novel_id: i64) -> bool {
        match self {
            Entitlement::Author { novel_ids, .. } => novel_ids.contains(&novel_id),
            _ => false,
        }
    }
}
