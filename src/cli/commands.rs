use crate::cli::args::{Cli, Commands};
use crate::converters::ConverterKind;
use crate::error::Result;
use crate::models::Track;
use crate::processors::DatumPipeline;
use crate::readers::{GpxReader, TrackLogReader};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::writers::GpxWriter;
use std::path::Path;
use tracing::{info, Level};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Shift {
            input,
            converter,
            output,
        } => {
            info!("Reading GPX: {}", input.display());
            let mut tracks = GpxReader::new().read_tracks(&input)?;

            let kind = converter.selected().unwrap_or(ConverterKind::Web);
            shift_tracks(&mut tracks, kind, &settings, cli.verbose).await?;

            write_output(&tracks, output.as_deref())?;
        }

        Commands::Import {
            input,
            converter,
            output,
        } => {
            info!("Reading track log: {}", input.display());
            let mut tracks = TrackLogReader::new().read_tracks(&input)?;

            if let Some(kind) = converter.selected() {
                shift_tracks(&mut tracks, kind, &settings, cli.verbose).await?;
            }

            write_output(&tracks, output.as_deref())?;
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays a clean GPX document
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn shift_tracks(
    tracks: &mut [Track],
    kind: ConverterKind,
    settings: &Settings,
    verbose: bool,
) -> Result<()> {
    let pipeline = DatumPipeline::new(kind.build(settings)?);
    info!("Shifting datum via {} converter", pipeline.converter_name());

    let segment_count: usize = tracks.iter().map(|t| t.segments.len()).sum();
    let progress = ProgressReporter::new(
        segment_count as u64,
        "Shifting track segments...",
        verbose,
    );

    let summary = pipeline.convert_tracks(tracks, Some(&progress)).await?;
    info!("{}", summary.summary());
    Ok(())
}

fn write_output(tracks: &[Track], output: Option<&Path>) -> Result<()> {
    let writer = GpxWriter::new();
    match output {
        Some(path) => {
            writer.write_file(tracks, path)?;
            info!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            writer.write_to(tracks, stdout.lock())?;
        }
    }
    Ok(())
}
