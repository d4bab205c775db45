//! End-to-end demo: detect streaks in a directory of frames.
//!
//! Usage: `cargo run --example detect_streaks -- <frames_dir> [output_dir]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use perseid::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let Some(frames_dir) = args.next().map(PathBuf::from) else {
        bail!("usage: detect_streaks <frames_dir> [output_dir]");
    };

    let mut config = DetectionConfig::default();
    if let Some(output_dir) = args.next() {
        config.output_dir = PathBuf::from(output_dir);
    }

    let progress: ProgressCallback = Some(Arc::new(|p: DetectionProgress| {
        eprintln!("[{}] {}/{}", p.stage, p.current, p.total);
    }));

    let outcome = run_detection_with_progress(&frames_dir, &config, &progress)
        .with_context(|| format!("detection run over '{}' failed", frames_dir.display()))?;

    match outcome {
        DetectionOutcome::NoFrames => println!("No frames found in {}", frames_dir.display()),
        DetectionOutcome::NoLines => println!("No lines detected."),
        DetectionOutcome::Success(report) => {
            println!(
                "{} candidate trajectory(ies) across {} frames",
                report.segments.len(),
                report.diagnostics.frame_count
            );
            for segment in &report.segments {
                println!(
                    "  ({:.1}, {:.1}) -> ({:.1}, {:.1})  length {:.1} px",
                    segment.x1, segment.y1, segment.x2, segment.y2,
                    segment.length()
                );
            }
            println!("merged:    {}", report.merged_path.display());
            println!("annotated: {}", report.annotated_path.display());
        }
    }

    Ok(())
}
