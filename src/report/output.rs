// Report output target - resolution and writing

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::config::HASH_PLACEHOLDER;

/// Where the serialized report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    File(PathBuf),
    Stdout,
}

impl ReportDestination {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdout => None,
        }
    }
}

/// Pick the explicit path over the fallback, then substitute `[hash]`.
/// Empty strings count as absent; `None` means standard output.
pub fn resolve_output_path(explicit: Option<&str>, fallback: Option<&str>) -> Option<PathBuf> {
    let raw = explicit
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.filter(|s| !s.is_empty()))?;
    Some(PathBuf::from(substitute_hash(raw)))
}

/// Replace every `[hash]` with one fresh random hex string
pub fn substitute_hash(path: &str) -> String {
    if path.contains(HASH_PLACEHOLDER) {
        path.replace(HASH_PLACEHOLDER, &random_hex())
    } else {
        path.to_string()
    }
}

/// 32 lowercase hex characters
pub fn random_hex() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Write the report, creating parent directories for file targets
pub fn write_report(destination: &ReportDestination, content: &str) -> Result<()> {
    match destination {
        ReportDestination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create report directory: {}", parent.display())
                })?;
            }
            fs::write(path, content)
                .with_context(|| format!("Failed to write TRX report file: {}", path.display()))?;
        }
        ReportDestination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write TRX report to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins_over_fallback() {
        let path = resolve_output_path(Some("explicit.trx"), Some("env.trx"));
        assert_eq!(path, Some(PathBuf::from("explicit.trx")));
    }

    #[test]
    fn test_fallback_used_when_explicit_missing() {
        assert_eq!(
            resolve_output_path(None, Some("env.trx")),
            Some(PathBuf::from("env.trx"))
        );
        assert_eq!(
            resolve_output_path(Some(""), Some("env.trx")),
            Some(PathBuf::from("env.trx"))
        );
    }

    #[test]
    fn test_nothing_resolves_to_stdout() {
        assert_eq!(resolve_output_path(None, None), None);
        assert_eq!(resolve_output_path(Some(""), Some("")), None);
    }

    #[test]
    fn test_hash_placeholder_is_replaced() {
        let resolved = substitute_hash("results/[hash].trx");
        let hash = resolved
            .strip_prefix("results/")
            .and_then(|s| s.strip_suffix(".trx"))
            .unwrap();
        assert_eq!(hash.len(), 32);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_all_placeholders_share_one_hash() {
        let resolved = substitute_hash("[hash]/[hash].trx");
        let (dir, file) = resolved.split_once('/').unwrap();
        assert_eq!(format!("{}.trx", dir), file);
    }

    #[test]
    fn test_write_report_creates_parent() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/deeper/out.trx");

        write_report(&ReportDestination::File(path.clone()), "<TestRun/>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<TestRun/>");
    }
}
