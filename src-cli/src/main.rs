//! region-export - save a pre-rendered region snapshot as a paginated PDF

mod args;

use anyhow::{Context, Result};
use args::CliArgs;
use region_export::{DirectorySink, DocumentExporter, ExportOptions, SnapshotSurface};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REGION_ID: &str = "snapshot";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse(std::env::args().skip(1))?;

    let options = match &args.options_file {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading options from {}", path.display()))?;
            ExportOptions::from_json(&json)?
        }
        None => ExportOptions::default(),
    };

    let mut surface = SnapshotSurface::new();
    surface
        .load_region(REGION_ID, &args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot.display()))?;

    tracing::info!(
        snapshot = %args.snapshot.display(),
        output = %args.output_dir.display(),
        filename = %args.filename,
        "exporting region"
    );

    let exporter = DocumentExporter::new(surface, DirectorySink::new(&args.output_dir));
    let report = exporter
        .export_region(REGION_ID, &args.filename, &options)
        .await
        .with_context(|| format!("exporting {}", args.filename))?;

    println!(
        "{}: {} page(s), {} bytes",
        args.output_dir.join(&report.filename).display(),
        report.page_count(),
        report.bytes_written
    );
    Ok(())
}
