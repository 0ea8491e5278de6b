use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use season_depth::{
    audit_with_thresholds, read_split_file, AuditOutcome, AuditThresholds, SeasonDepthConfig,
    SeasonDepthDataset, ValColorLayout,
};

#[derive(Parser, Debug)]
#[command(
    name = "season_depth_probe",
    about = "Resolve a SeasonDepth split file and report ground-truth availability and missing files"
)]
struct Args {
    /// Split file with one `<folder> [<frame_index> <side>]` entry per line.
    #[arg(long)]
    split_file: PathBuf,
    /// Config file (defaults to $SEASON_DEPTH_CONFIG, then ./season-depth.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the dataset root from the config.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Append the image filename to val color paths.
    #[arg(long, default_value_t = false)]
    val_color_with_filename: bool,
    /// Only audit the first N entries.
    #[arg(long)]
    limit: Option<usize>,
    /// Exit non-zero when the audit fails its thresholds.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => SeasonDepthConfig::from_path(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => SeasonDepthConfig::load(),
    };
    if let Some(root) = args.root {
        cfg.root = root;
    }
    if args.val_color_with_filename {
        cfg.val_color_layout = ValColorLayout::WithFilename;
    }

    let mut filenames = read_split_file(&args.split_file)
        .with_context(|| format!("read split file {}", args.split_file.display()))?;
    if let Some(limit) = args.limit {
        filenames.truncate(limit);
    }

    let dataset = SeasonDepthDataset::new(&cfg, filenames);
    let report = audit_with_thresholds(&dataset, &AuditThresholds::from_env())
        .context("audit split")?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if args.strict && report.outcome == AuditOutcome::Fail {
        anyhow::bail!("audit failed: {}", report.reasons.join("; "));
    }
    Ok(())
}
