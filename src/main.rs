use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shift_planner::api::{AppState, create_router};
use shift_planner::config::{ConfigLoader, PlannerConfig};
use shift_planner::export::report_to_csv;
use shift_planner::models::DateRange;
use shift_planner::planner::Planner;
use shift_planner::store::Database;

#[derive(Parser)]
#[command(name = "shift-planner")]
#[command(version)]
#[command(about = "Weekly shift generation and hours reporting", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config/planner.yaml")]
    config: PathBuf,

    /// Overrides the data file named in the configuration
    #[arg(long)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serves the JSON API
    Serve {
        /// Overrides the bind address named in the configuration
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Generates the missing shifts of one week
    Generate {
        /// Monday starting the week (YYYY-MM-DD)
        #[arg(short, long)]
        week: NaiveDate,
    },
    /// Prints the hours report for a date range
    Report {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        /// Prints CSV instead of JSON
        #[arg(long)]
        csv: bool,
    },
}

async fn open_store(
    config: &PlannerConfig,
    data_file: Option<PathBuf>,
) -> Result<Database, Box<dyn std::error::Error>> {
    let path = data_file.or_else(|| config.data_file.as_ref().map(PathBuf::from));
    let db = match path {
        Some(path) => Database::open(path, &config.seed).await?,
        None => Database::in_memory(&config.seed).await?,
    };
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let loader = ConfigLoader::load(&cli.config)?;
    let config = loader.config();
    let mut planner = Planner::new(open_store(config, cli.data_file).await?);

    match cli.command {
        Commands::Serve { bind } => {
            let address = bind.unwrap_or_else(|| config.bind_address.clone());
            let router = create_router(AppState::new(planner));
            let listener = tokio::net::TcpListener::bind(&address).await?;
            info!(address = %address, "Starting API server");
            axum::serve(listener, router).await?;
        }
        Commands::Generate { week } => {
            let created = planner.generate_week(week).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Commands::Report { from, to, csv } => {
            let report = planner.build_report(DateRange::new(from, to)?).await?;
            if csv {
                print!("{}", report_to_csv(&report)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    Ok(())
}
