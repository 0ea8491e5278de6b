//! Split audit: how many keys resolve, and how many files are actually on disk.

use crate::dataset::SeasonDepthDataset;
use crate::loader::ImageLoader;
use crate::types::{
    AuditOutcome, AuditReport, AuditThresholds, DatasetResult, Split, SplitAudit,
};

/// Walk every sample key without decoding anything.
pub fn audit<L: ImageLoader>(dataset: &SeasonDepthDataset<L>) -> SplitAudit {
    let mut out = SplitAudit::default();
    for sample in dataset.filenames() {
        out.total += 1;
        let paths = match dataset.resolve(&sample.folder) {
            Ok(paths) => paths,
            Err(e) => {
                log::debug!("audit: {e}");
                out.invalid += 1;
                continue;
            }
        };
        match paths.split {
            Split::Train => out.train += 1,
            Split::Val => out.val += 1,
        }
        if !paths.color.is_file() {
            out.missing_color += 1;
        }
        if !paths.depth.is_file() {
            out.missing_depth += 1;
        }
    }
    out
}

/// Judge an audit against thresholds.
///
/// Any invalid key or missing file makes the report at least `Warn`. A count
/// or ratio over its limit makes it `Fail`. Missing depth maps only count when
/// the split has ground truth; otherwise the split is inference-only.
pub fn validate_audit(
    audit: SplitAudit,
    has_ground_truth: bool,
    thresholds: &AuditThresholds,
) -> AuditReport {
    let total = audit.total.max(1) as f32;
    let missing = audit.missing_color + if has_ground_truth { audit.missing_depth } else { 0 };
    let checks = [
        ("invalid keys", audit.invalid, thresholds.max_invalid, thresholds.max_invalid_ratio),
        ("missing files", missing, thresholds.max_missing, thresholds.max_missing_ratio),
    ];

    let mut reasons = Vec::new();
    let mut observed = false;
    let mut failed = false;
    for (label, count, max_count, max_ratio) in checks {
        if count == 0 {
            continue;
        }
        observed = true;
        let ratio = count as f32 / total;
        let over_count = max_count.filter(|&max| count > max);
        let over_ratio = max_ratio.filter(|&max| ratio > max);
        if let Some(max) = over_count {
            reasons.push(format!("{label}: {count} exceeds max {max}"));
        }
        if let Some(max) = over_ratio {
            reasons.push(format!("{label}: ratio {ratio:.3} exceeds max {max:.3}"));
        }
        failed |= over_count.is_some() || over_ratio.is_some();
        reasons.push(format!("{label}: {count} observed"));
    }

    let outcome = match (failed, observed) {
        (true, _) => AuditOutcome::Fail,
        (false, true) => AuditOutcome::Warn,
        (false, false) => AuditOutcome::Pass,
    };
    AuditReport {
        outcome,
        reasons,
        has_ground_truth,
        audit,
    }
}

pub fn audit_with_thresholds<L: ImageLoader>(
    dataset: &SeasonDepthDataset<L>,
    thresholds: &AuditThresholds,
) -> DatasetResult<AuditReport> {
    let has_ground_truth = dataset.check_depth()?;
    Ok(validate_audit(audit(dataset), has_ground_truth, thresholds))
}
