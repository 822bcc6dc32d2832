//! Group Registry
//!
//! Name -> group lookup shared by the peer server and anything else that
//! resolves groups by name. Groups are never removed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::group::{Getter, Group};

#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group and registers it under `name`, replacing any group
    /// previously registered with that name.
    pub fn new_group<G>(&self, name: impl Into<String>, cache_bytes: u64, getter: G) -> Arc<Group>
    where
        G: Getter + 'static,
    {
        let group = Arc::new(Group::new(name, cache_bytes, getter));

        let mut groups = self.groups.write();
        if groups
            .insert(group.name().to_string(), Arc::clone(&group))
            .is_some()
        {
            info!(group = group.name(), "replaced existing group");
        }
        group
    }

    /// Looks up a group by name.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for GroupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupRegistry")
            .field("groups", &self.names())
            .finish()
    }
}
