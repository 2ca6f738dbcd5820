//! Runtime backend abstraction.
//!
//! A backend is the thinnest possible seam over liblxc: it creates container
//! objects, adjusts their reference counts, lists names, and answers version
//! and capability queries. Lifecycle rules, locking, and version gating live
//! above it, in `lxcbind-runtime`.

pub mod liblxc;
pub mod memory;

use std::fmt;

use lxcbind_common::types::DiscoveryMode;

pub use liblxc::{LiblxcBackend, RawContainer};
pub use memory::{MemoryBackend, MemoryContainer, MemoryObject};

/// Result of dropping one reference to a container object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Other references remain; the object is still alive.
    Retained,
    /// That was the last reference; the object has been destroyed.
    Freed,
    /// The runtime reported an error.
    Failed,
}

/// Names reported by a runtime listing primitive.
///
/// `count` is the runtime's return value verbatim and may be zero or
/// negative; callers decide how to interpret it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    /// Count returned by the listing call.
    pub count: i32,
    /// Names filled in by the listing call.
    pub names: Vec<String>,
}

/// Access to a container runtime.
///
/// Implementors must be safe to call from many threads at once; the
/// reference count of each object is owned by the runtime, not by callers.
pub trait LxcBackend: Send + Sync {
    /// Opaque reference to one runtime container object.
    type Raw: Copy + Send + Sync + fmt::Debug;

    /// Creates a container object for `name`, scoped to `lxcpath` or the
    /// runtime default. The object starts with one reference.
    ///
    /// Returns `None` when the runtime refuses.
    fn container_new(&self, name: &str, lxcpath: Option<&str>) -> Option<Self::Raw>;

    /// Adds a reference. Returns false if the runtime refuses.
    fn container_get(&self, raw: Self::Raw) -> bool;

    /// Drops a reference, destroying the object when it was the last one.
    fn container_put(&self, raw: Self::Raw) -> PutOutcome;

    /// Runs the listing primitive for `mode`.
    fn list_containers(&self, mode: DiscoveryMode, lxcpath: Option<&str>) -> RawListing;

    /// Version string as reported by the runtime.
    fn version(&self) -> String;

    /// Value of a global configuration item, if set.
    fn global_config_item(&self, key: &str) -> Option<String>;

    /// Asks the runtime whether it implements an API extension.
    ///
    /// Callers must check the runtime version first; see
    /// `lxcbind_common::constants::API_EXTENSIONS_MIN_VERSION`.
    fn has_api_extension(&self, extension: &str) -> bool;

    /// Asks the runtime whether `key` is a configuration item it understands.
    fn config_item_is_supported(&self, key: &str) -> bool;
}
