use crate::cli::Cli;
use crate::config::PartialPipelineConfig;
use crate::error::Result;
use crate::progress::BatchProgressHandler;
use mabfeat::pipeline::progress::ProgressReporter;
use mabfeat::workflows::batch::{self, CollectionMode};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;
use tracing::info;

pub fn execute(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    let partial = match &cli.config {
        Some(path) => PartialPipelineConfig::from_file(path)?,
        None => PartialPipelineConfig::default(),
    };
    let config = partial.merge_with_cli(cli)?;

    let mode = if cli.wait {
        CollectionMode::Streaming
    } else {
        CollectionMode::Collect
    };

    let progress_handler = BatchProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Starting batch processing of {:?}", &cli.input);
    let records = batch::run(&cli.input, &config, mode, &reporter)?;

    let mut writer = BufWriter::new(File::create(&cli.output)?);
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()?;

    let with_features = records.iter().filter(|r| !r.features.is_empty()).count();
    let elapsed = start.elapsed().as_secs_f64();
    info!(
        elapsed_seconds = elapsed,
        files = records.len(),
        with_features,
        "Batch finished."
    );
    println!(
        "Processing complete in {:.2} seconds. {} of {} file(s) produced features. Results saved to {}",
        elapsed,
        with_features,
        records.len(),
        cli.output.display()
    );

    Ok(())
}
