use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::Result;
use mindscreen_core::models::user::Gender;

mod commands;

#[derive(Parser)]
#[command(name = "mindscreen")]
#[command(about = "Score a mental health screening and enrich it with AI insights")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one completed assessment
    Assess {
        /// JSON file with the responses ("-" for stdin)
        #[arg(long, conflicts_with = "values")]
        answers: Option<PathBuf>,

        /// Comma-separated answer values in item order, e.g. 1,0,2,...
        #[arg(long, value_delimiter = ',')]
        values: Vec<u32>,

        #[arg(long, default_value = "phq9")]
        instrument: String,

        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        zip_code: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// List registered instruments
    Instruments,

    /// Inspect or manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings with keys redacted
    Show,
    /// Print the settings file path
    Path,
    /// Write the effective settings (file + environment) to disk
    Init,
    /// Remove the settings file
    Delete,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config_path = match cli.config {
        Some(path) => path,
        None => mindscreen_engine::config::default_path()?,
    };

    match cli.command {
        Commands::Assess {
            answers,
            values,
            instrument,
            age,
            gender,
            country,
            city,
            zip_code,
            format,
        } => {
            let input = match answers {
                Some(path) => commands::AnswerSource::File(path),
                None => commands::AnswerSource::Values(values),
            };
            let ctx = mindscreen_core::models::user::UserContext {
                age,
                gender,
                country,
                city,
                zip_code,
            };
            commands::assess(&config_path, &instrument, input, ctx, format).await
        }
        Commands::Instruments => commands::list_instruments(),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::show_config(&config_path),
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
            ConfigAction::Init => commands::init_config(&config_path),
            ConfigAction::Delete => commands::delete_config(&config_path),
        },
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
