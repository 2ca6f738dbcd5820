//! Backend that calls into the host's liblxc.

use std::ffi::{CString, c_char};
use std::path::Path;
use std::ptr::{self, NonNull};

use lxcbind_common::error::Result;
use lxcbind_common::types::DiscoveryMode;

use super::{LxcBackend, PutOutcome, RawListing};
use crate::ffi::{self, Liblxc, LxcContainer};

/// A `struct lxc_container *` owned by liblxc's reference count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawContainer(NonNull<LxcContainer>);

// SAFETY: liblxc serializes reference count changes on a container with the
// object's own lock, so the pointer may be used from any thread.
unsafe impl Send for RawContainer {}
// SAFETY: see `Send` above.
unsafe impl Sync for RawContainer {}

/// Backend over a dynamically loaded liblxc.
#[derive(Debug)]
pub struct LiblxcBackend {
    lib: Liblxc,
}

impl LiblxcBackend {
    /// Loads liblxc, preferring `library` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if liblxc cannot be opened or lacks a required symbol.
    pub fn load(library: Option<&Path>) -> Result<Self> {
        let lib = Liblxc::open(library)?;
        Ok(Self { lib })
    }

    fn predicate(&self, f: Option<ffi::PredicateFn>, arg: &str) -> bool {
        let (Some(f), Ok(arg)) = (f, CString::new(arg)) else {
            return false;
        };
        // SAFETY: `arg` is NUL-terminated and outlives the call.
        unsafe { f(arg.as_ptr()) }
    }
}

impl LxcBackend for LiblxcBackend {
    type Raw = RawContainer;

    fn container_new(&self, name: &str, lxcpath: Option<&str>) -> Option<RawContainer> {
        let name = CString::new(name).ok()?;
        let mut path_slot = None;
        let path = ffi::optional_c_path(lxcpath, &mut path_slot)?;
        // SAFETY: both strings are NUL-terminated (or NULL) and outlive the call.
        let raw = unsafe { (self.lib.container_new)(name.as_ptr(), path) };
        NonNull::new(raw).map(RawContainer)
    }

    fn container_get(&self, raw: RawContainer) -> bool {
        // SAFETY: `raw` came from lxc_container_new and still holds a reference.
        unsafe { (self.lib.container_get)(raw.0.as_ptr()) == 1 }
    }

    fn container_put(&self, raw: RawContainer) -> PutOutcome {
        // SAFETY: `raw` came from lxc_container_new and still holds a reference.
        match unsafe { (self.lib.container_put)(raw.0.as_ptr()) } {
            1 => PutOutcome::Freed,
            0 => PutOutcome::Retained,
            _ => PutOutcome::Failed,
        }
    }

    fn list_containers(&self, mode: DiscoveryMode, lxcpath: Option<&str>) -> RawListing {
        let list = match mode {
            DiscoveryMode::All => self.lib.list_all_containers,
            DiscoveryMode::Defined => self.lib.list_defined_containers,
            DiscoveryMode::Active => self.lib.list_active_containers,
        };

        let mut path_slot = None;
        let Some(path) = ffi::optional_c_path(lxcpath, &mut path_slot) else {
            return RawListing::default();
        };

        let mut names: *mut *mut c_char = ptr::null_mut();
        // SAFETY: `path` is NULL or NUL-terminated; passing NULL for `cret`
        // asks liblxc for names only.
        let count = unsafe { list(path, &mut names, ptr::null_mut()) };
        // SAFETY: liblxc hands over `names` holding `count` owned strings.
        let names = unsafe { ffi::take_names(names, count) };
        RawListing { count, names }
    }

    fn version(&self) -> String {
        // SAFETY: lxc_get_version returns a static string.
        unsafe { ffi::borrowed_string((self.lib.get_version)()) }.unwrap_or_default()
    }

    fn global_config_item(&self, key: &str) -> Option<String> {
        let key = CString::new(key).ok()?;
        // SAFETY: `key` is NUL-terminated; the result is owned by liblxc.
        unsafe { ffi::borrowed_string((self.lib.get_global_config_item)(key.as_ptr())) }
    }

    fn has_api_extension(&self, extension: &str) -> bool {
        self.predicate(self.lib.has_api_extension, extension)
    }

    fn config_item_is_supported(&self, key: &str) -> bool {
        self.predicate(self.lib.config_item_is_supported, key)
    }
}
