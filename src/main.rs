use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use itinerary_atlas::{
    AtlasConfig, AtlasError, Coordinates, ErrorCode, ItineraryAnalyzer, ItineraryInput,
    ItineraryView, LocationClassifier, LookupReport, MapViewport, PlaceNameExtractor,
    TripRequest, logging, parse_itinerary,
};

#[derive(Parser)]
#[command(
    name = "itinerary-atlas",
    version,
    about = "Turn generated travel itineraries into day schedules and map points"
)]
struct Cli {
    /// Configuration file (defaults to <config dir>/itinerary-atlas/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the day-by-day schedule (no network access)
    Schedule {
        /// Itinerary text file; reads stdin when omitted
        file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Extract and geocode the places mentioned in an itinerary
    Places {
        file: Option<PathBuf>,
        /// Trip destination, used as the first place and to qualify lookups
        #[arg(long)]
        destination: String,
        /// Only extract and classify, skip geocoding
        #[arg(long)]
        offline: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Schedule, places and map viewport in one run
    Analyze {
        file: Option<PathBuf>,
        #[arg(long)]
        destination: String,
        /// Number of days the itinerary was requested for
        #[arg(long)]
        days: Option<u32>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the generation prompt for a trip
    Prompt {
        #[arg(long)]
        destination: String,
        #[arg(long)]
        days: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    run(cli).await.inspect_err(|e| {
        if let Some(error) = e.downcast_ref::<AtlasError>() {
            eprintln!("{}", error.user_message());
        }
    })
}

async fn run(cli: Cli) -> Result<()> {
    let config = AtlasConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;
    debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Commands::Schedule { file, format } => {
            let text = read_input(file.as_deref()).await?;
            let days = parse_itinerary(&text);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&days)?),
                OutputFormat::Text => {
                    for day in &days {
                        println!("{day}");
                    }
                }
            }
        }
        Commands::Places {
            file,
            destination,
            offline,
            format,
        } => {
            let text = read_input(file.as_deref()).await?;
            if offline {
                let extractor = PlaceNameExtractor::new(config.extraction.max_candidates);
                let places = LocationClassifier::classify_all(
                    extractor.extract(&text, &destination),
                );
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&places)?),
                    OutputFormat::Text => {
                        for place in &places {
                            println!("{:<12} {}", place.category, place.name);
                        }
                    }
                }
            } else {
                let analyzer = ItineraryAnalyzer::from_config(&config)?;
                let resolution = analyzer.locate_places(&text, &destination).await;
                check_lookups(&resolution.report)?;
                let points = resolution.points;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&points)?),
                    OutputFormat::Text => {
                        for point in &points {
                            println!(
                                "{:<12} {} ({})",
                                point.category,
                                point.name,
                                point.coordinates().format_coordinates()
                            );
                        }
                    }
                }
            }
        }
        Commands::Analyze {
            file,
            destination,
            days,
            format,
        } => {
            let text = read_input(file.as_deref()).await?;
            let mut input = ItineraryInput::new(text, destination);
            input.requested_days = days;

            let analyzer = ItineraryAnalyzer::from_config(&config)?;
            let cancel = cancel_on_ctrl_c();
            let view = analyzer.analyze_until_cancelled(&input, &cancel).await?;
            let view_unavailable = view.geocoding_unavailable();
            let lookups = view.lookups;
            let fallback = MapViewport::fallback(
                Coordinates {
                    latitude: 0.0,
                    longitude: 0.0,
                },
                config.map.default_zoom,
            );

            match format {
                OutputFormat::Json => {
                    let mut view = view;
                    view.viewport.get_or_insert(fallback);
                    println!("{}", serde_json::to_string_pretty(&view)?);
                }
                OutputFormat::Text => print_view(&view, &fallback),
            }
            if view_unavailable {
                eprintln!(
                    "Warning: all {} geocoding lookups failed; the map is empty",
                    lookups.attempted
                );
            }
        }
        Commands::Prompt { destination, days } => {
            let request = TripRequest::new(&destination, days.as_str())?;
            print!("{}", request.prompt());
        }
    }

    Ok(())
}

async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read itinerary from {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read itinerary from stdin")?;
            Ok(text)
        }
    }
}

/// Fail when the provider answered none of the lookups
fn check_lookups(report: &LookupReport) -> Result<()> {
    if report.all_failed() {
        return Err(AtlasError::api(
            format!("All {} geocoding lookups failed", report.attempted),
            ErrorCode::ApiNetworkError,
        )
        .into());
    }
    Ok(())
}

/// Token cancelled by the first Ctrl+C
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling...");
            trigger.cancel();
        }
    });
    cancel
}

fn print_view(view: &ItineraryView, fallback: &MapViewport) {
    for day in &view.days {
        println!("{day}");
    }

    println!("📍 Places");
    for point in &view.points {
        println!(
            "   {:<12} {} ({})",
            point.category,
            point.name,
            point.coordinates().format_coordinates()
        );
    }

    let viewport = view.viewport.as_ref().unwrap_or(fallback);
    println!(
        "🗺  Center {} at zoom {} ({:.1} km across)",
        viewport.center.format_coordinates(),
        viewport.zoom,
        viewport.span_km
    );
}
