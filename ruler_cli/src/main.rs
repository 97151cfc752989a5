use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use geo_types::Point;
use map_ruler_lib::{geometry::line_feature, recording::RecordingSurface, LabelFormat, MeasurePoint, RulerControl, RulerOptions, Unit};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod gpx_input;
mod report;
mod script;

#[derive(Parser)]
#[command(name = "RulerCLI")]
#[command(about = "Measure great-circle distances the way the map ruler does", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure a path given as lon,lat pairs
    Measure {
        #[arg(short, long, default_value = "km")]
        units: Unit,
        /// Only print the running total
        #[arg(long)]
        sum_only: bool,
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<MeasurePoint>,
    },
    /// Measure every track in a gpx file
    Gpx {
        #[arg(short, long, default_value = "km")]
        units: Unit,
        #[arg(long)]
        sum_only: bool,
        file: PathBuf,
    },
    /// Replay a json script of clicks, drags and button presses
    Replay {
        /// Json file with ruler options
        #[arg(long)]
        options: Option<PathBuf>,
        /// Print the measured line as GeoJSON
        #[arg(long)]
        geojson: bool,
        script: PathBuf,
    },
}

fn label_format(sum_only: bool) -> LabelFormat {
    if sum_only {
        LabelFormat::SumOnly
    } else {
        LabelFormat::DeltaAndSum
    }
}

fn default_log_filter() -> String {
    format!("{}=trace", env!("CARGO_CRATE_NAME"))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Measure { units, sum_only, points } => {
            let points: Vec<Point> = points.iter().map(|p| p.position).collect();
            let labels = report::measure(&points, units, label_format(sum_only))?;
            report::print_labels(&labels);
        }
        Commands::Gpx { units, sum_only, file } => {
            for track in gpx_input::read_tracks(&file)? {
                println!("{} ({} points)", track.name, track.points.len());
                let labels = report::measure(&track.points, units, label_format(sum_only))?;
                if let Some(last) = labels.last() {
                    println!("{}", report::plain(last));
                }
            }
        }
        Commands::Replay { options, geojson, script } => {
            let options = match options {
                Some(path) => script::load_options(&path)?,
                None => RulerOptions::default(),
            };
            let steps = script::load_script(&script)?;

            let mut ruler = RulerControl::new(RecordingSurface::new(), options)?;
            script::run(&mut ruler, &steps);

            for event in &ruler.surface().events {
                println!("{}\tmeasuring={}", event.name(), event.measuring());
            }
            println!("measuring={} units={}", ruler.is_measuring(), ruler.units());
            report::print_labels(ruler.labels());

            if geojson {
                println!("{}", serde_json::to_string_pretty(&line_feature(ruler.points()))?);
            }
        }
    }

    Ok(())
}

#[test]
fn log_filter_traces_this_crate() {
    assert_eq!(default_log_filter(), "ruler_cli=trace");
}
