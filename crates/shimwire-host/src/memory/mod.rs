//! In-process host runtime.
//!
//! [`MemoryHost`] keeps classes in a map and clients in a list. It counts
//! every [`find_class`](HostRuntime::find_class) call per name, which lets
//! tests observe how many real lookups the symbol layer performed.
//!
//! [`Release`] installs the reference layout of one host release on top of
//! a `MemoryHost` and manages its clients.

mod release;

pub use release::{IMPLEMENTATION_PREFIX, INTERNAL_PREFIX, Release};

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::{ClassRef, HostRuntime, ObjectRef};

/// A host application living entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    namespace: Option<String>,
    classes: RwLock<HashMap<String, ClassRef>>,
    clients: RwLock<Vec<ObjectRef>>,
    lookups: Mutex<HashMap<String, usize>>,
    lookup_delay: Option<Duration>,
}

impl MemoryHost {
    pub fn builder() -> MemoryHostBuilder {
        MemoryHostBuilder::default()
    }

    /// Registers (or replaces) a class under its qualified name.
    pub fn define(&self, class: ClassRef) {
        self.classes.write().insert(class.name().to_string(), class);
    }

    /// Removes a class, simulating a release that lacks it.
    pub fn remove_class(&self, qualified_name: &str) -> bool {
        self.classes.write().remove(qualified_name).is_some()
    }

    /// Looks up a class without counting it as a resolution attempt.
    pub fn class(&self, qualified_name: &str) -> Option<ClassRef> {
        self.classes.read().get(qualified_name).cloned()
    }

    pub fn add_client(&self, client: ObjectRef) {
        self.clients.write().push(client);
    }

    /// Removes a client from the roster. Returns `false` if it was absent.
    pub fn remove_client(&self, client: &ObjectRef) -> bool {
        let mut clients = self.clients.write();
        let before = clients.len();
        clients.retain(|c| c != client);
        clients.len() != before
    }

    /// How many times `find_class` was called for `qualified_name`.
    pub fn lookup_count(&self, qualified_name: &str) -> usize {
        self.lookups.lock().get(qualified_name).copied().unwrap_or(0)
    }

    /// Total `find_class` calls across all names.
    pub fn total_lookups(&self) -> usize {
        self.lookups.lock().values().sum()
    }
}

impl HostRuntime for MemoryHost {
    fn implementation_namespace(&self) -> Option<String> {
        self.namespace.clone()
    }

    fn find_class(&self, qualified_name: &str) -> Option<ClassRef> {
        *self
            .lookups
            .lock()
            .entry(qualified_name.to_string())
            .or_insert(0) += 1;

        if let Some(delay) = self.lookup_delay {
            std::thread::sleep(delay);
        }

        let found = self.class(qualified_name);
        tracing::trace!(
            class = qualified_name,
            found = found.is_some(),
            "memory host class lookup"
        );
        found
    }

    fn online_clients(&self) -> Vec<ObjectRef> {
        self.clients.read().clone()
    }
}

/// Builder for [`MemoryHost`].
#[derive(Debug, Default)]
pub struct MemoryHostBuilder {
    namespace: Option<String>,
    classes: Vec<ClassRef>,
    lookup_delay: Option<Duration>,
}

impl MemoryHostBuilder {
    /// Sets the implementation namespace the host reports.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn class(mut self, class: ClassRef) -> Self {
        self.classes.push(class);
        self
    }

    /// Makes every `find_class` call sleep, widening race windows in
    /// concurrency tests.
    pub fn lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = Some(delay);
        self
    }

    pub fn build(self) -> MemoryHost {
        let host = MemoryHost {
            namespace: self.namespace,
            lookup_delay: self.lookup_delay,
            ..MemoryHost::default()
        };
        for class in self.classes {
            host.define(class);
        }
        host
    }
}
