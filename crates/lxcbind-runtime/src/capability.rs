//! Runtime capability queries.
//!
//! Asking liblxc about API extensions is itself only possible from 3.1.0
//! onward; older runtimes are answered with `false` without being asked.

use lxcbind_common::constants::API_EXTENSIONS_MIN_VERSION;
use lxcbind_core::backend::LxcBackend;
use lxcbind_core::version::VersionOrdinal;

/// Whether the runtime implements the API extension `extension`.
pub fn has_api_extension<B: LxcBackend>(backend: &B, extension: &str) -> bool {
    let (major, minor, micro) = API_EXTENSIONS_MIN_VERSION;
    let version = backend.version();
    if !VersionOrdinal::parse(&version).at_least(major, minor, micro) {
        tracing::debug!(%version, extension, "runtime too old for extension queries");
        return false;
    }
    backend.has_api_extension(extension)
}

/// Whether the runtime understands the configuration key `key`.
pub fn is_supported_config_item<B: LxcBackend>(backend: &B, key: &str) -> bool {
    backend.config_item_is_supported(key)
}

#[cfg(test)]
mod tests {
    use lxcbind_core::backend::MemoryBackend;

    use super::*;

    #[test]
    fn extension_query_passes_through_on_new_runtime() {
        let backend = MemoryBackend::new()
            .with_version("3.1.0")
            .with_extension("mount_injection_file");
        assert!(has_api_extension(&backend, "mount_injection_file"));
        assert!(!has_api_extension(&backend, "network_veth_routes"));
    }

    #[test]
    fn extension_query_is_refused_on_old_runtime() {
        let backend = MemoryBackend::new()
            .with_version("3.0.4")
            .with_extension("mount_injection_file");
        assert!(!has_api_extension(&backend, "mount_injection_file"));
    }

    #[test]
    fn extension_query_is_refused_on_unparseable_version() {
        let backend = MemoryBackend::new()
            .with_version("unknown")
            .with_extension("seccomp_notify");
        assert!(!has_api_extension(&backend, "seccomp_notify"));
    }

    #[test]
    fn devel_runtime_is_asked() {
        let backend = MemoryBackend::new()
            .with_version("3.0.0-devel")
            .with_extension("seccomp_notify");
        assert!(has_api_extension(&backend, "seccomp_notify"));
    }

    #[test]
    fn config_items_are_not_version_gated() {
        let backend = MemoryBackend::new()
            .with_version("2.0.0")
            .with_config_item("lxc.apparmor.profile");
        assert!(is_supported_config_item(&backend, "lxc.apparmor.profile"));
        assert!(!is_supported_config_item(&backend, "lxc.aa_profile"));
    }
}
