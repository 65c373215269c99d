//! The `User` value type.

use crate::ResourceId;
use crate::ids::UserId;

/// A named participant contending for resources.
///
/// `assigned` records the resource this user requested at dispatch.  The
/// model is one request per user, so it is set at most once; re-requesting
/// is out of scope.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    id:           UserId,
    name:         String,
    assigned:     Option<ResourceId>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        User {
            id,
            name: name.into(),
            assigned: None,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resource this user requested, if it has dispatched yet.
    pub fn assigned(&self) -> Option<ResourceId> {
        self.assigned
    }

    /// Record the resource this user requested.  Called once by the driver
    /// at dispatch time.
    pub fn assign(&mut self, resource: ResourceId) {
        self.assigned = Some(resource);
    }
}
