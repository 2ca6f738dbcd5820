//! `lxcb version` — Show the liblxc version and the binding baseline.

use clap::Args;
use lxcbind_common::constants::APP_NAME;
use lxcbind_core::backend::LxcBackend;
use lxcbind_runtime::Lxc;
use serde::Serialize;

use crate::output;

/// Arguments for the `version` command.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct VersionReport {
    lxcbind: &'static str,
    liblxc: String,
    devel: bool,
    built_against: String,
}

impl VersionReport {
    fn collect<B: LxcBackend>(lxc: &Lxc<B>) -> Self {
        Self {
            lxcbind: env!("CARGO_PKG_VERSION"),
            liblxc: lxc.version(),
            devel: lxc.runtime_version().is_devel(),
            built_against: lxc.built_against().to_string(),
        }
    }
}

/// Renders the `version` output.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render<B: LxcBackend>(lxc: &Lxc<B>, args: &VersionArgs) -> anyhow::Result<String> {
    let report = VersionReport::collect(lxc);
    if args.json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    Ok(output::format_rows(&[
        (APP_NAME, report.lxcbind.to_string()),
        ("liblxc", report.liblxc),
        ("devel", output::yes_no(report.devel).to_string()),
        ("built against", report.built_against),
    ]))
}

/// Executes the `version` command.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn execute<B: LxcBackend>(lxc: &Lxc<B>, args: &VersionArgs) -> anyhow::Result<()> {
    println!("{}", render(lxc, args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use lxcbind_core::backend::MemoryBackend;

    use super::*;

    #[test]
    fn table_shows_devel_runtime() {
        let lxc = Lxc::with_backend(MemoryBackend::new().with_version("5.0.0-devel"));
        let out = render(&lxc, &VersionArgs { json: false }).unwrap();
        assert!(out.contains("liblxc         5.0.0 (devel)"));
        assert!(out.contains("devel          yes"));
    }

    #[test]
    fn json_report() {
        let lxc = Lxc::with_backend(MemoryBackend::new().with_version("4.0.12"));
        let out = render(&lxc, &VersionArgs { json: true }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["liblxc"], "4.0.12");
        assert_eq!(value["devel"], false);
        assert_eq!(value["lxcbind"], env!("CARGO_PKG_VERSION"));
    }
}
