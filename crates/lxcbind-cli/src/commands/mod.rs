//! CLI command definitions and dispatch.

pub mod check;
pub mod config;
pub mod ls;
pub mod version;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lxcbind_common::config::LxcConfig;
use lxcbind_common::constants::BIN_NAME;
use lxcbind_runtime::Lxc;

/// lxcb — inspect LXC containers through liblxc.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Default container path (overrides the config file and `LXCBIND_LXCPATH`).
    #[arg(long, global = true)]
    pub lxcpath: Option<String>,

    /// JSON configuration file.
    #[arg(long, global = true, env = "LXCBIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// liblxc shared object to load instead of the system one.
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List container names.
    Ls(ls::LsArgs),
    /// Show the liblxc version and the binding baseline.
    Version(version::VersionArgs),
    /// Check whether liblxc supports an API extension or config key.
    Check(check::CheckArgs),
    /// Show liblxc global configuration values.
    Config(config::ConfigArgs),
}

/// Builds the engine configuration: file, then environment, then flags.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be loaded.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<LxcConfig> {
    let base = match &cli.config {
        Some(path) => LxcConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => LxcConfig::default(),
    };
    let mut config = base.with_env_overrides();
    if let Some(lxcpath) = &cli.lxcpath {
        config.lxcpath = Some(lxcpath.clone());
    }
    if let Some(library) = &cli.library {
        config.library = Some(library.clone());
    }
    tracing::debug!(?config, "configuration resolved");
    Ok(config)
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if liblxc cannot be loaded or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let lxc = Lxc::load(config).context("loading liblxc")?;

    match cli.command {
        Command::Ls(args) => ls::execute(&lxc, &args),
        Command::Version(args) => version::execute(&lxc, &args),
        Command::Check(args) => check::execute(&lxc, &args),
        Command::Config(args) => config::execute(&lxc, &args),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["lxcb", "ls", "--active", "--lxcpath", "/srv/lxc"]).unwrap();
        assert_eq!(cli.lxcpath.as_deref(), Some("/srv/lxc"));
        assert!(matches!(cli.command, Command::Ls(ref args) if args.active));
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"lxcpath": "/from/file", "built_against": "3.0.0"}}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let argv = ["lxcb", "--config", &path, "--lxcpath", "/from/flag", "version"];
        let cli = Cli::try_parse_from(argv).unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.lxcpath.as_deref(), Some("/from/flag"));
        assert_eq!(config.built_against, "3.0.0");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let argv = ["lxcb", "--config", "/nonexistent/lxcb.json", "version"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(resolve_config(&cli).is_err());
    }
}
