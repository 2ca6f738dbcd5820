//! Container discovery.
//!
//! Enumeration is best-effort: a container may disappear between being listed
//! and being looked up, so names whose handle cannot be created are skipped
//! rather than failing the whole call. Nothing is retried.

use std::sync::Arc;

use lxcbind_common::types::{DiscoveryMode, Verbosity};
use lxcbind_core::backend::LxcBackend;

use crate::container::ContainerHandle;

/// Lists container names for `mode`, scoped to `lxcpath` or the runtime
/// default.
///
/// A zero or negative count from the runtime yields an empty list.
pub fn list_names<B: LxcBackend>(
    backend: &B,
    mode: DiscoveryMode,
    lxcpath: Option<&str>,
) -> Vec<String> {
    let listing = backend.list_containers(mode, lxcpath);
    let count = match usize::try_from(listing.count) {
        Ok(count) if count > 0 => count,
        _ => {
            tracing::debug!(
                %mode,
                lxcpath = ?lxcpath,
                count = listing.count,
                "no containers listed"
            );
            return Vec::new();
        }
    };

    let mut names = listing.names;
    names.truncate(count);
    tracing::debug!(%mode, lxcpath = ?lxcpath, count = names.len(), "containers listed");
    names
}

/// Lists containers for `mode` and creates one handle per name.
///
/// Each returned handle holds one reference the caller must release. Names
/// whose handle cannot be created are left out.
pub fn list_handles<B: LxcBackend>(
    backend: &Arc<B>,
    mode: DiscoveryMode,
    lxcpath: Option<&str>,
    verbosity: Verbosity,
) -> Vec<ContainerHandle<B>> {
    list_names(backend.as_ref(), mode, lxcpath)
        .into_iter()
        .filter_map(|name| {
            ContainerHandle::create(Arc::clone(backend), &name, lxcpath)
                .map(|handle| handle.with_verbosity(verbosity))
                .map_err(|e| tracing::debug!(error = %e, "skipping container"))
                .ok()
        })
        .collect()
}
