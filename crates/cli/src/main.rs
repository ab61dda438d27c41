mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use podium_client::{ChartKind, ClientConfig};
use rust_decimal::Decimal;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Podium event page tooling: PIN and promo code checks, chart configs.
#[derive(Parser)]
#[command(
    name = "podium",
    version,
    about = "Podium event page tooling: PIN and promo code checks, chart configs"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Site root the AJAX endpoints live under (overrides PODIUM_BASE_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a participant by PIN and show the resulting page state
    CheckPin {
        /// Event id
        #[arg(long)]
        event: u64,
        /// PIN as typed by the participant
        #[arg(long)]
        pin: String,
        /// Answer from a saved response body instead of the server
        #[arg(long)]
        response: Option<PathBuf>,
    },

    /// Check a promo code and show the resulting price and label
    CheckPromo {
        /// Event id
        #[arg(long)]
        event: u64,
        /// Promo code as typed by the participant
        #[arg(long)]
        code: String,
        /// Price shown when no valid code is applied
        #[arg(long)]
        default_price: Decimal,
        /// Default payment label, when the page has one
        #[arg(long)]
        default_label: Option<String>,
        /// Answer from a saved response body instead of the server
        #[arg(long)]
        response: Option<PathBuf>,
    },

    /// Build a Chart.js config from a {labels, data} JSON file
    Chart {
        /// Chart type: bar or doughnut
        kind: ChartKind,
        /// Path to the chart data JSON file
        data: PathBuf,
        /// Wrap the config together with the global chart defaults
        #[arg(long)]
        with_defaults: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ClientConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                report_error(&format!("error: {}", e), cli.output, cli.quiet);
                process::exit(1);
            }
        },
        None => ClientConfig::default(),
    };

    logging::init_logging(config.logging.format, &config.logging.level, cli.quiet);

    let ctx = commands::Context {
        config,
        base_url: cli.base_url,
        output: cli.output,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::CheckPin {
            event,
            pin,
            response,
        } => {
            commands::pin::cmd_check_pin(&ctx, event, &pin, response.as_deref());
        }
        Commands::CheckPromo {
            event,
            code,
            default_price,
            default_label,
            response,
        } => {
            commands::promo::cmd_check_promo(
                &ctx,
                commands::promo::PromoArgs {
                    event,
                    code: &code,
                    default_price,
                    default_label: default_label.as_deref(),
                    response: response.as_deref(),
                },
            );
        }
        Commands::Chart {
            kind,
            data,
            with_defaults,
        } => {
            commands::chart::cmd_chart(&ctx, kind, &data, with_defaults);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet && output == OutputFormat::Text {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
