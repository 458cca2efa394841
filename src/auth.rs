//! Admin authorization.
//!
//! Every command goes through [`AuthorizationGate::authorize`] before its
//! arguments are looked at. Callers that fail the check get no reply at all.

/// Equality check against the configured admin identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationGate {
    admin_id: i64,
}

impl AuthorizationGate {
    pub fn new(admin_id: i64) -> Self {
        Self { admin_id }
    }

    pub fn authorize(&self, originator_id: i64) -> bool {
        originator_id == self.admin_id
    }
}
