//! In-process backend with real reference counting.
//!
//! Mirrors liblxc's observable behavior closely enough to exercise the handle
//! lifecycle, discovery, and capability layers without a host LXC install:
//! every created object carries its own reference count and is destroyed when
//! the count reaches zero.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use lxcbind_common::constants::LXCPATH_KEY;
use lxcbind_common::types::DiscoveryMode;

use super::{LxcBackend, PutOutcome, RawListing};

/// Default container path used when a call gives none.
pub const MEMORY_DEFAULT_LXCPATH: &str = "/var/lib/lxc";

/// Version reported unless overridden.
pub const MEMORY_DEFAULT_VERSION: &str = "4.0.12";

/// Identifier of one in-memory container object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryObject(u64);

/// A container known to the in-memory runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryContainer {
    /// Container name.
    pub name: String,
    /// Path the container lives in; `None` means the backend default.
    pub lxcpath: Option<String>,
    /// Whether a configuration exists on disk.
    pub defined: bool,
    /// Whether the container is running.
    pub active: bool,
}

impl MemoryContainer {
    /// A defined container that is not running.
    #[must_use]
    pub fn stopped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lxcpath: None,
            defined: true,
            active: false,
        }
    }

    /// A defined container that is running.
    #[must_use]
    pub fn running(name: impl Into<String>) -> Self {
        Self {
            active: true,
            ..Self::stopped(name)
        }
    }

    /// A running container without a configuration on disk.
    #[must_use]
    pub fn transient(name: impl Into<String>) -> Self {
        Self {
            defined: false,
            ..Self::running(name)
        }
    }

    /// Places the container under `lxcpath`.
    #[must_use]
    pub fn in_path(mut self, lxcpath: impl Into<String>) -> Self {
        self.lxcpath = Some(lxcpath.into());
        self
    }

    const fn matches(&self, mode: DiscoveryMode) -> bool {
        match mode {
            DiscoveryMode::All => self.defined || self.active,
            DiscoveryMode::Defined => self.defined,
            DiscoveryMode::Active => self.active,
        }
    }
}

#[derive(Debug, Default)]
struct ObjectTable {
    next_id: u64,
    refs: HashMap<MemoryObject, usize>,
    created: u64,
}

/// In-process runtime.
#[derive(Debug)]
pub struct MemoryBackend {
    default_lxcpath: String,
    version: String,
    containers: Vec<MemoryContainer>,
    extensions: HashSet<String>,
    config_items: HashSet<String>,
    global_config: HashMap<String, String>,
    failing: HashSet<String>,
    reported_count: Option<i32>,
    objects: Mutex<ObjectTable>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates an empty runtime reporting [`MEMORY_DEFAULT_VERSION`].
    #[must_use]
    pub fn new() -> Self {
        let mut global_config = HashMap::new();
        let _ = global_config.insert(LXCPATH_KEY.to_string(), MEMORY_DEFAULT_LXCPATH.to_string());
        Self {
            default_lxcpath: MEMORY_DEFAULT_LXCPATH.to_string(),
            version: MEMORY_DEFAULT_VERSION.to_string(),
            containers: Vec::new(),
            extensions: HashSet::new(),
            config_items: HashSet::new(),
            global_config,
            failing: HashSet::new(),
            reported_count: None,
            objects: Mutex::new(ObjectTable::default()),
        }
    }

    /// Sets the version string the runtime reports.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds a container.
    #[must_use]
    pub fn with_container(mut self, container: MemoryContainer) -> Self {
        self.containers.push(container);
        self
    }

    /// Marks an API extension as implemented.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let _ = self.extensions.insert(extension.into());
        self
    }

    /// Marks a configuration key as supported.
    #[must_use]
    pub fn with_config_item(mut self, key: impl Into<String>) -> Self {
        let _ = self.config_items.insert(key.into());
        self
    }

    /// Sets a global configuration value.
    #[must_use]
    pub fn with_global_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.global_config.insert(key.into(), value.into());
        self
    }

    /// Makes object creation fail for `name`, as for a container destroyed
    /// between listing and lookup.
    #[must_use]
    pub fn failing_creation_of(mut self, name: impl Into<String>) -> Self {
        let _ = self.failing.insert(name.into());
        self
    }

    /// Overrides the count returned by every listing call.
    #[must_use]
    pub const fn with_reported_count(mut self, count: i32) -> Self {
        self.reported_count = Some(count);
        self
    }

    /// Current reference count of an object, or `None` once destroyed.
    pub fn ref_count(&self, object: MemoryObject) -> Option<usize> {
        self.table().refs.get(&object).copied()
    }

    /// Number of objects that have not been destroyed.
    pub fn live_objects(&self) -> usize {
        self.table().refs.len()
    }

    /// Number of objects ever created.
    pub fn created_objects(&self) -> u64 {
        self.table().created
    }

    fn table(&self) -> MutexGuard<'_, ObjectTable> {
        // The table is left consistent by every critical section.
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LxcBackend for MemoryBackend {
    type Raw = MemoryObject;

    fn container_new(&self, name: &str, lxcpath: Option<&str>) -> Option<MemoryObject> {
        if name.is_empty() || name.contains('\0') || self.failing.contains(name) {
            tracing::debug!(name, ?lxcpath, "memory runtime refused container object");
            return None;
        }
        let mut table = self.table();
        let object = MemoryObject(table.next_id);
        table.next_id += 1;
        table.created += 1;
        let _ = table.refs.insert(object, 1);
        Some(object)
    }

    fn container_get(&self, raw: MemoryObject) -> bool {
        self.table().refs.get_mut(&raw).is_some_and(|count| {
            *count += 1;
            true
        })
    }

    fn container_put(&self, raw: MemoryObject) -> PutOutcome {
        let mut table = self.table();
        let Some(count) = table.refs.get_mut(&raw) else {
            return PutOutcome::Failed;
        };
        *count -= 1;
        if *count == 0 {
            let _ = table.refs.remove(&raw);
            PutOutcome::Freed
        } else {
            PutOutcome::Retained
        }
    }

    fn list_containers(&self, mode: DiscoveryMode, lxcpath: Option<&str>) -> RawListing {
        let scope = lxcpath.unwrap_or(&self.default_lxcpath);
        let names: Vec<String> = self
            .containers
            .iter()
            .filter(|c| c.lxcpath.as_deref().unwrap_or(&self.default_lxcpath) == scope)
            .filter(|c| c.matches(mode))
            .map(|c| c.name.clone())
            .collect();
        let count = self
            .reported_count
            .unwrap_or_else(|| i32::try_from(names.len()).unwrap_or(i32::MAX));
        RawListing { count, names }
    }

    fn version(&self) -> String {
        self.version.clone()
    }

    fn global_config_item(&self, key: &str) -> Option<String> {
        self.global_config.get(key).cloned()
    }

    fn has_api_extension(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    fn config_item_is_supported(&self, key: &str) -> bool {
        self.config_items.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_object_starts_with_one_reference() {
        let backend = MemoryBackend::new();
        let obj = backend.container_new("web", None).unwrap();
        assert_eq!(backend.ref_count(obj), Some(1));
    }

    #[test]
    fn last_put_destroys_object() {
        let backend = MemoryBackend::new();
        let obj = backend.container_new("web", None).unwrap();
        assert!(backend.container_get(obj));
        assert_eq!(backend.container_put(obj), PutOutcome::Retained);
        assert_eq!(backend.container_put(obj), PutOutcome::Freed);
        assert_eq!(backend.ref_count(obj), None);
        assert!(!backend.container_get(obj));
        assert_eq!(backend.container_put(obj), PutOutcome::Failed);
    }

    #[test]
    fn objects_for_same_name_are_distinct() {
        let backend = MemoryBackend::new();
        let a = backend.container_new("web", None).unwrap();
        let b = backend.container_new("web", None).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.live_objects(), 2);
    }

    #[test]
    fn failing_names_are_refused() {
        let backend = MemoryBackend::new().failing_creation_of("gone");
        assert!(backend.container_new("gone", None).is_none());
        assert!(backend.container_new("", None).is_none());
        assert_eq!(backend.created_objects(), 0);
    }

    #[test]
    fn listing_filters_by_mode_and_path() {
        let backend = MemoryBackend::new()
            .with_container(MemoryContainer::stopped("db"))
            .with_container(MemoryContainer::running("web"))
            .with_container(MemoryContainer::transient("scratch"))
            .with_container(MemoryContainer::running("ci").in_path("/srv/lxc"));

        assert_eq!(
            backend.list_containers(DiscoveryMode::All, None).names,
            vec!["db", "web", "scratch"]
        );
        assert_eq!(
            backend.list_containers(DiscoveryMode::Defined, None).names,
            vec!["db", "web"]
        );
        assert_eq!(
            backend.list_containers(DiscoveryMode::Active, None).names,
            vec!["web", "scratch"]
        );
        let scoped = backend.list_containers(DiscoveryMode::All, Some("/srv/lxc"));
        assert_eq!(scoped.count, 1);
        assert_eq!(scoped.names, vec!["ci"]);
    }

    #[test]
    fn reported_count_overrides_name_count() {
        let backend = MemoryBackend::new()
            .with_container(MemoryContainer::running("web"))
            .with_reported_count(-1);
        let listing = backend.list_containers(DiscoveryMode::All, None);
        assert_eq!(listing.count, -1);
        assert_eq!(listing.names, vec!["web"]);
    }

    #[test]
    fn default_path_is_exposed_as_global_config() {
        let backend = MemoryBackend::new();
        assert_eq!(
            backend.global_config_item(LXCPATH_KEY).as_deref(),
            Some(MEMORY_DEFAULT_LXCPATH)
        );
        assert!(backend.global_config_item("lxc.bdev.zfs.root").is_none());
    }
}
