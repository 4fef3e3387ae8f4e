use serde::{Deserialize, Serialize};

use scriptorium_core::SubjectId;

use crate::Role;

/// An authenticated principal, as resolved from a verified credential.
///
/// The role is the one asserted by the token at issue time. It is not
/// re-read from storage, so a role change only takes effect once the
/// subject's outstanding tokens expire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub role: Role,
}

impl Subject {
    pub fn new(id: SubjectId, role: Role) -> Self {
        Self { id, role }
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "subject {} ({})", self.id, self.role)
    }
}
