//! `lxcb config` — Show liblxc global configuration values.

use clap::Args;
use lxcbind_common::constants::{LVM_VG_KEY, LXCPATH_KEY, ZFS_ROOT_KEY};
use lxcbind_core::backend::LxcBackend;
use lxcbind_runtime::Lxc;

use crate::output;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Key to look up; without one the storage and path defaults are shown.
    pub key: Option<String>,
}

/// Renders the `config` output.
pub fn render<B: LxcBackend>(lxc: &Lxc<B>, args: &ConfigArgs) -> String {
    match &args.key {
        Some(key) => output::or_unset(lxc.global_config_item(key)),
        None => output::format_rows(&[
            (LXCPATH_KEY, output::or_unset(lxc.default_config_path())),
            (LVM_VG_KEY, output::or_unset(lxc.default_lvm_vg())),
            (ZFS_ROOT_KEY, output::or_unset(lxc.default_zfs_root())),
        ]),
    }
}

/// Executes the `config` command.
///
/// # Errors
///
/// Never fails today; the signature matches the other commands.
pub fn execute<B: LxcBackend>(lxc: &Lxc<B>, args: &ConfigArgs) -> anyhow::Result<()> {
    println!("{}", render(lxc, args));
    Ok(())
}

#[cfg(test)]
mod tests {
    use lxcbind_core::backend::MemoryBackend;

    use super::*;

    #[test]
    fn defaults_table() {
        let lxc = Lxc::with_backend(MemoryBackend::new().with_global_config(LVM_VG_KEY, "lxc"));
        let out = render(&lxc, &ConfigArgs { key: None });
        assert_eq!(
            out,
            "lxc.lxcpath        /var/lib/lxc\nlxc.bdev.lvm.vg    lxc\nlxc.bdev.zfs.root  -"
        );
    }

    #[test]
    fn single_key() {
        let lxc = Lxc::with_backend(
            MemoryBackend::new().with_global_config("lxc.default_config", "/etc/lxc/default.conf"),
        );
        let key = |k: &str| ConfigArgs { key: Some(k.into()) };
        assert_eq!(render(&lxc, &key("lxc.default_config")), "/etc/lxc/default.conf");
        assert_eq!(render(&lxc, &key("lxc.cgroup.pattern")), "-");
    }
}
