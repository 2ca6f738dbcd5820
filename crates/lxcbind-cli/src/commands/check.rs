//! `lxcb check` — Query liblxc for API extensions and config keys.

use anyhow::bail;
use clap::{Args, Subcommand};
use lxcbind_core::backend::LxcBackend;
use lxcbind_runtime::Lxc;

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// What to check.
    #[command(subcommand)]
    pub target: CheckTarget,
}

/// Things liblxc can be asked about.
#[derive(Subcommand, Debug)]
pub enum CheckTarget {
    /// An API extension, e.g. `mount_injection_file`.
    Extension {
        /// Extension name.
        name: String,
    },
    /// A configuration key, e.g. `lxc.apparmor.profile`.
    ConfigItem {
        /// Configuration key.
        key: String,
    },
}

/// Answers the check; `(subject, supported)`.
pub fn evaluate<B: LxcBackend>(lxc: &Lxc<B>, target: &CheckTarget) -> (String, bool) {
    match target {
        CheckTarget::Extension { name } => {
            (format!("API extension {name:?}"), lxc.has_api_extension(name))
        }
        CheckTarget::ConfigItem { key } => {
            (format!("config item {key:?}"), lxc.is_supported_config_item(key))
        }
    }
}

/// Executes the `check` command.
///
/// # Errors
///
/// Returns an error, and so a non-zero exit, when the item is unsupported.
pub fn execute<B: LxcBackend>(lxc: &Lxc<B>, args: &CheckArgs) -> anyhow::Result<()> {
    let (subject, supported) = evaluate(lxc, &args.target);
    if !supported {
        bail!("{subject} is not supported by liblxc {}", lxc.version());
    }
    println!("{subject} is supported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use lxcbind_core::backend::MemoryBackend;

    use super::*;

    fn extension(name: &str) -> CheckArgs {
        CheckArgs {
            target: CheckTarget::Extension { name: name.into() },
        }
    }

    #[test]
    fn supported_extension_succeeds() {
        let lxc = Lxc::with_backend(MemoryBackend::new().with_extension("seccomp_notify"));
        assert!(execute(&lxc, &extension("seccomp_notify")).is_ok());
    }

    #[test]
    fn extension_on_old_runtime_fails() {
        let lxc = Lxc::with_backend(
            MemoryBackend::new()
                .with_version("3.0.3")
                .with_extension("seccomp_notify"),
        );
        let err = execute(&lxc, &extension("seccomp_notify")).unwrap_err();
        assert!(err.to_string().contains("3.0.3"));
    }

    #[test]
    fn config_item_check() {
        let lxc = Lxc::with_backend(MemoryBackend::new().with_config_item("lxc.net.0.type"));
        let key = |key: &str| CheckTarget::ConfigItem { key: key.into() };
        assert!(evaluate(&lxc, &key("lxc.net.0.type")).1);
        assert!(!evaluate(&lxc, &key("lxc.network.type")).1);
    }
}
