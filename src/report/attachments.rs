// Attachment relocation into the `<report>/In/<dir>/` layout TRX viewers read

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::trx::UnitTestResult;
use crate::utils::FileUtils;

/// `<output without extension>/In/<relative results directory>`
pub fn attachments_dir(output: &Path, relative_dir: &str) -> PathBuf {
    FileUtils::without_extension(output)
        .join("In")
        .join(relative_dir)
}

/// Copy `attachments` next to the report and reference them from `result`.
/// I/O failures are logged and skipped; the result itself is never dropped.
/// Returns the number of files referenced.
pub fn relocate_attachments(
    result: &mut UnitTestResult,
    attachments: &[PathBuf],
    output: &Path,
) -> usize {
    if attachments.is_empty() {
        return 0;
    }

    let dir = attachments_dir(output, result.ensure_results_directory());
    if let Err(e) = fs::create_dir_all(&dir) {
        error!(
            "Failed to create attachment directory {}: {}",
            dir.display(),
            e
        );
        return 0;
    }

    let mut copied = 0;
    for attachment in attachments {
        let already_attached = FileUtils::base_name(attachment)
            .filter(|name| result.result_files.contains(name));
        if let Some(name) = already_attached {
            warn!(
                "Skipping attachment {}: {} is already attached to this result",
                attachment.display(),
                name
            );
            continue;
        }
        match FileUtils::copy_into_dir(attachment, &dir) {
            Ok(name) => {
                debug!("Copied attachment {} into {}", attachment.display(), dir.display());
                result.add_result_file(name);
                copied += 1;
            }
            Err(e) => error!("Failed to copy attachment {}: {:#}", attachment.display(), e),
        }
    }
    copied
}
