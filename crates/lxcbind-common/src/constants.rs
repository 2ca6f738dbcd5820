//! System-wide constants, liblxc global config keys, and version markers.

/// Global config key holding the default container path.
pub const LXCPATH_KEY: &str = "lxc.lxcpath";

/// Global config key holding the default LVM volume group.
pub const LVM_VG_KEY: &str = "lxc.bdev.lvm.vg";

/// Global config key holding the default ZFS root.
pub const ZFS_ROOT_KEY: &str = "lxc.bdev.zfs.root";

/// Suffix liblxc appends to its version when built from unreleased source.
pub const DEVEL_SUFFIX: &str = "-devel";

/// Display form of [`DEVEL_SUFFIX`].
pub const DEVEL_DISPLAY_SUFFIX: &str = " (devel)";

/// Separator after which packagers append build metadata.
pub const BUILD_METADATA_SEPARATOR: char = '~';

/// First liblxc release that can answer API extension queries.
pub const API_EXTENSIONS_MIN_VERSION: (u32, u32, u32) = (3, 1, 0);

/// liblxc version this binding was built against.
///
/// Overridden at compile time through `LXCBIND_LXC_VERSION`.
pub const BINDING_LXC_VERSION: &str = match option_env!("LXCBIND_LXC_VERSION") {
    Some(version) => version,
    None => "4.0.0",
};

/// Shared object names tried, in order, when loading liblxc.
pub const LIBLXC_SONAMES: [&str; 2] = ["liblxc.so.1", "liblxc.so"];

/// Environment variable overriding the default container path.
pub const ENV_LXCPATH: &str = "LXCBIND_LXCPATH";

/// Environment variable pointing at a specific liblxc shared object.
pub const ENV_LIBRARY: &str = "LXCBIND_LIBRARY";

/// Environment variable switching handles to verbose lifecycle logging.
pub const ENV_VERBOSE: &str = "LXCBIND_VERBOSE";

/// Application name used in CLI output.
pub const APP_NAME: &str = "lxcbind";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "lxcb";
