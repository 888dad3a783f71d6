//! One-shot rewrite of legacy listings into canonical shape.
//!
//! Runs once at startup. It is safe to repeat and safe to interleave with
//! reads: a row that has not been rewritten yet is normalized on the read
//! path anyway, so a pass that stops halfway leaves nothing inconsistent.

use tracing::{info, warn};

use crate::store::{RecordStore, StoreError};

/// Outcome counters for one upgrade pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeReport {
    pub scanned: usize,
    pub upgraded: usize,
    pub malformed: usize,
    pub failed: usize,
}

/// Rewrite every stored listing that is not in reduced canonical form.
///
/// Only listing the table can fail the pass. Per-row problems are logged,
/// counted and skipped.
pub async fn upgrade_all(store: &dyn RecordStore) -> Result<UpgradeReport, StoreError> {
    let rows = store.list_all().await?;
    let mut report = UpgradeReport {
        scanned: rows.len(),
        ..Default::default()
    };

    for (id, blob) in rows {
        let rewritten = match common::product::upgrade(&blob) {
            Ok(Some(rewritten)) => rewritten,
            Ok(None) => continue,
            Err(e) => {
                warn!(id = %id, error = %e, "Skipping malformed product during upgrade");
                report.malformed += 1;
                continue;
            }
        };

        match store.replace(&id, &rewritten).await {
            Ok(()) => report.upgraded += 1,
            // Deleted since the listing was taken.
            Err(StoreError::NotFound(_)) => {}
            Err(e) => {
                warn!(id = %id, error = %e, "Failed to persist upgraded product");
                report.failed += 1;
            }
        }
    }

    info!(
        scanned = report.scanned,
        upgraded = report.upgraded,
        malformed = report.malformed,
        failed = report.failed,
        "Product upgrade pass finished"
    );

    Ok(report)
}
