use crate::converters::ConverterKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "track-datum")]
#[command(about = "Convert track logs to GPX and shift them from the Tokyo datum to JGD2000")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Log each conversion step to stderr")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Settings file (TOML, JSON, YAML, ...)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shift the track points of a GPX file to the target datum
    Shift {
        #[arg(help = "Input GPX file")]
        input: PathBuf,

        #[command(flatten)]
        converter: ConverterArgs,

        #[arg(short, long, help = "Output GPX file [default: stdout]")]
        output: Option<PathBuf>,
    },

    /// Convert a track log to GPX, optionally shifting the datum
    Import {
        #[arg(help = "Input track log (track,segment,latitude,longitude,elevation,time)")]
        input: PathBuf,

        #[command(flatten)]
        converter: ConverterArgs,

        #[arg(short, long, help = "Output GPX file [default: stdout]")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ConverterArgs {
    #[arg(long, conflicts_with = "local", help = "Shift via the web conversion service")]
    pub web: bool,

    #[arg(long, help = "Shift with the local geodesy pipeline")]
    pub local: bool,
}

impl ConverterArgs {
    /// Explicitly requested converter, if any
    pub fn selected(&self) -> Option<ConverterKind> {
        if self.local {
            Some(ConverterKind::Local)
        } else if self.web {
            Some(ConverterKind::Web)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_defaults_to_no_explicit_converter() {
        let cli = Cli::try_parse_from(["track-datum", "shift", "in.gpx"]).unwrap();
        match cli.command {
            Commands::Shift { converter, .. } => assert_eq!(converter.selected(), None),
            _ => panic!("expected shift"),
        }
    }

    #[test]
    fn test_local_flag_and_global_verbose() {
        let cli =
            Cli::try_parse_from(["track-datum", "import", "log.csv", "--local", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Import { converter, .. } => {
                assert_eq!(converter.selected(), Some(ConverterKind::Local))
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_web_and_local_conflict() {
        assert!(Cli::try_parse_from(["track-datum", "shift", "in.gpx", "--web", "--local"]).is_err());
    }
}
