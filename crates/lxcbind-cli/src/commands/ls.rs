//! `lxcb ls` — List container names.

use clap::Args;
use lxcbind_core::backend::LxcBackend;
use lxcbind_runtime::{DiscoveryMode, Lxc};

use crate::output;

/// Arguments for the `ls` command.
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Only containers with a configuration on disk.
    #[arg(long, conflicts_with = "active")]
    pub defined: bool,

    /// Only running containers.
    #[arg(long)]
    pub active: bool,

    /// Only containers whose handle can actually be opened.
    #[arg(long)]
    pub resolve: bool,

    /// Print a JSON array instead of one name per line.
    #[arg(long)]
    pub json: bool,
}

impl LsArgs {
    const fn mode(&self) -> DiscoveryMode {
        if self.defined {
            DiscoveryMode::Defined
        } else if self.active {
            DiscoveryMode::Active
        } else {
            DiscoveryMode::All
        }
    }
}

/// Renders the `ls` output.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render<B: LxcBackend>(lxc: &Lxc<B>, args: &LsArgs) -> anyhow::Result<String> {
    let mode = args.mode();
    let names = if args.resolve {
        let handles = lxc.containers(mode, None);
        let names: Vec<String> = handles.iter().map(|h| h.name().to_string()).collect();
        for handle in &handles {
            if !handle.release() {
                tracing::warn!(name = handle.name(), "failed to release container handle");
            }
        }
        names
    } else {
        lxc.container_names(mode, None)
    };

    if args.json {
        Ok(serde_json::to_string(&names)?)
    } else {
        Ok(output::format_names(&names))
    }
}

/// Executes the `ls` command.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn execute<B: LxcBackend>(lxc: &Lxc<B>, args: &LsArgs) -> anyhow::Result<()> {
    println!("{}", render(lxc, args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use lxcbind_core::backend::{MemoryBackend, MemoryContainer};

    use super::*;

    fn args(defined: bool, active: bool, resolve: bool, json: bool) -> LsArgs {
        LsArgs {
            defined,
            active,
            resolve,
            json,
        }
    }

    fn lxc() -> Lxc<MemoryBackend> {
        Lxc::with_backend(
            MemoryBackend::new()
                .with_container(MemoryContainer::stopped("db"))
                .with_container(MemoryContainer::running("web"))
                .failing_creation_of("db"),
        )
    }

    #[test]
    fn lists_all_by_default() {
        assert_eq!(render(&lxc(), &args(false, false, false, false)).unwrap(), "db\nweb");
    }

    #[test]
    fn mode_flags_select_listing() {
        assert_eq!(render(&lxc(), &args(true, false, false, false)).unwrap(), "db\nweb");
        assert_eq!(render(&lxc(), &args(false, true, false, false)).unwrap(), "web");
    }

    #[test]
    fn resolve_drops_unopenable_containers_and_releases_the_rest() {
        let lxc = lxc();
        assert_eq!(render(&lxc, &args(false, false, true, true)).unwrap(), r#"["web"]"#);
        assert_eq!(lxc.backend().live_objects(), 0);
    }

    #[test]
    fn empty_listing_message() {
        let lxc = Lxc::with_backend(MemoryBackend::new());
        assert_eq!(
            render(&lxc, &args(false, false, false, false)).unwrap(),
            "No containers found."
        );
        assert_eq!(render(&lxc, &args(false, false, false, true)).unwrap(), "[]");
    }
}
