//! Engine that binds a runtime backend to an explicit configuration.

use std::sync::Arc;

use lxcbind_common::config::LxcConfig;
use lxcbind_common::constants::{LVM_VG_KEY, LXCPATH_KEY, ZFS_ROOT_KEY};
use lxcbind_common::error::Result;
use lxcbind_common::types::DiscoveryMode;
use lxcbind_core::backend::{LiblxcBackend, LxcBackend};
use lxcbind_core::version::{self, VersionOrdinal};

use crate::capability;
use crate::container::ContainerHandle;
use crate::discovery;

/// The entry point for handle creation, discovery, and runtime queries.
///
/// The default container path and the binding's baseline version come from
/// the [`LxcConfig`] given at construction rather than from process-wide
/// state, so several engines with different settings can coexist.
pub struct Lxc<B: LxcBackend> {
    backend: Arc<B>,
    config: LxcConfig,
    built_against: VersionOrdinal,
}

impl Lxc<LiblxcBackend> {
    /// Creates an engine over the host's liblxc.
    ///
    /// # Errors
    ///
    /// Returns an error if liblxc cannot be loaded.
    pub fn load(config: LxcConfig) -> Result<Self> {
        let backend = LiblxcBackend::load(config.library.as_deref())?;
        Ok(Self::new(Arc::new(backend), config))
    }
}

impl<B: LxcBackend> Lxc<B> {
    /// Creates an engine over `backend`.
    pub fn new(backend: Arc<B>, config: LxcConfig) -> Self {
        let built_against = VersionOrdinal::parse(&config.built_against);
        if !built_against.is_parseable() {
            tracing::warn!(
                built_against = %config.built_against,
                "unparseable baseline version, build-time version checks will fail"
            );
        }
        Self {
            backend,
            config,
            built_against,
        }
    }

    /// Creates an engine over `backend` with the default configuration.
    pub fn with_backend(backend: B) -> Self {
        Self::new(Arc::new(backend), LxcConfig::default())
    }

    /// The runtime backend.
    pub const fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// The configuration this engine was built with.
    pub const fn config(&self) -> &LxcConfig {
        &self.config
    }

    /// Creates a handle for `name` in `path`, or the configured default path.
    ///
    /// The caller owns one reference and must eventually release it.
    ///
    /// # Errors
    ///
    /// Returns [`LxcError::CreationFailed`](lxcbind_common::error::LxcError::CreationFailed)
    /// if the runtime refuses.
    pub fn new_container(&self, name: &str, path: Option<&str>) -> Result<ContainerHandle<B>> {
        let path = self.config.resolve_path(path);
        Ok(ContainerHandle::create(Arc::clone(&self.backend), name, path)?
            .with_verbosity(self.config.verbosity))
    }

    /// Names of the containers selected by `mode`.
    pub fn container_names(&self, mode: DiscoveryMode, path: Option<&str>) -> Vec<String> {
        discovery::list_names(self.backend.as_ref(), mode, self.config.resolve_path(path))
    }

    /// Handles for the containers selected by `mode`; see
    /// [`discovery::list_handles`].
    pub fn containers(&self, mode: DiscoveryMode, path: Option<&str>) -> Vec<ContainerHandle<B>> {
        discovery::list_handles(
            &self.backend,
            mode,
            self.config.resolve_path(path),
            self.config.verbosity,
        )
    }

    /// Names of defined and active containers.
    pub fn all_container_names(&self, path: Option<&str>) -> Vec<String> {
        self.container_names(DiscoveryMode::All, path)
    }

    /// Names of defined containers.
    pub fn defined_container_names(&self, path: Option<&str>) -> Vec<String> {
        self.container_names(DiscoveryMode::Defined, path)
    }

    /// Names of active containers.
    pub fn active_container_names(&self, path: Option<&str>) -> Vec<String> {
        self.container_names(DiscoveryMode::Active, path)
    }

    /// Handles for defined and active containers.
    pub fn all_containers(&self, path: Option<&str>) -> Vec<ContainerHandle<B>> {
        self.containers(DiscoveryMode::All, path)
    }

    /// Handles for defined containers.
    pub fn defined_containers(&self, path: Option<&str>) -> Vec<ContainerHandle<B>> {
        self.containers(DiscoveryMode::Defined, path)
    }

    /// Handles for active containers.
    pub fn active_containers(&self, path: Option<&str>) -> Vec<ContainerHandle<B>> {
        self.containers(DiscoveryMode::Active, path)
    }

    /// Runtime version in display form, e.g. `5.0.0 (devel)`.
    pub fn version(&self) -> String {
        version::display_version(&self.backend.version())
    }

    /// Parsed runtime version.
    pub fn runtime_version(&self) -> VersionOrdinal {
        VersionOrdinal::parse(&self.backend.version())
    }

    /// Whether the running liblxc is at least `major.minor.micro`.
    pub fn runtime_version_at_least(&self, major: u32, minor: u32, micro: u32) -> bool {
        self.runtime_version().at_least(major, minor, micro)
    }

    /// Version the binding was built against.
    pub const fn built_against(&self) -> &VersionOrdinal {
        &self.built_against
    }

    /// Whether the binding was built against liblxc `major.minor.micro` or
    /// newer.
    pub fn version_at_least(&self, major: u32, minor: u32, micro: u32) -> bool {
        version::compile_time_at_least(&self.built_against, major, minor, micro)
    }

    /// Major and minor version the binding was built against.
    pub fn version_number(&self) -> (u32, u32) {
        (
            self.built_against.major().unwrap_or_default(),
            self.built_against.minor().unwrap_or_default(),
        )
    }

    /// Whether the runtime implements an API extension.
    pub fn has_api_extension(&self, extension: &str) -> bool {
        capability::has_api_extension(self.backend.as_ref(), extension)
    }

    /// Whether the runtime understands a configuration key.
    pub fn is_supported_config_item(&self, key: &str) -> bool {
        capability::is_supported_config_item(self.backend.as_ref(), key)
    }

    /// Value of a global configuration item; unset and empty values are
    /// `None`.
    pub fn global_config_item(&self, key: &str) -> Option<String> {
        self.backend
            .global_config_item(key)
            .filter(|value| !value.is_empty())
    }

    /// Runtime default container path (`lxc.lxcpath`).
    pub fn default_config_path(&self) -> Option<String> {
        self.global_config_item(LXCPATH_KEY)
    }

    /// Default LVM volume group (`lxc.bdev.lvm.vg`).
    pub fn default_lvm_vg(&self) -> Option<String> {
        self.global_config_item(LVM_VG_KEY)
    }

    /// Default ZFS root (`lxc.bdev.zfs.root`).
    pub fn default_zfs_root(&self) -> Option<String> {
        self.global_config_item(ZFS_ROOT_KEY)
    }
}

impl<B: LxcBackend> std::fmt::Debug for Lxc<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lxc")
            .field("config", &self.config)
            .field("built_against", &self.built_against)
            .finish_non_exhaustive()
    }
}
