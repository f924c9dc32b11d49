use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use ocr_connector::cli::{list_resources, pull_reports};
use owo_colors::OwoColorize;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// One Click Retail connector: pull weekly CSV reports as batches of rows
#[derive(Parser)]
#[command(name = "ocr", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every configured report and write its rows as NDJSON
    Pull {
        /// Source configuration (YAML) listing the resources to fetch
        #[arg(short, long, default_value = "source.yml")]
        config: String,

        /// NDJSON file to write rows to
        #[arg(short, long, default_value = "reports.ndjson")]
        output: String,

        /// Maximum number of rows per batch
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Show the configured resources in processing order
    Resources {
        /// Source configuration (YAML) listing the resources to fetch
        #[arg(short, long, default_value = "source.yml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match dotenvy::from_filename(&cli.env) {
        Ok(path) => log::debug!("Sourced environment from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No {} file found", cli.env),
        Err(e) => return Err(e.into()),
    }

    match cli.command {
        Commands::Pull {
            config,
            output,
            batch_size,
        } => {
            log::info!(
                "Pulling reports from {} to {}",
                config.bright_black(),
                output.bright_black()
            );
            let count = pull_reports(&config, &output, batch_size).await?;
            log::info!("Wrote {} rows to {}", count.cyan(), output.bright_black());
        }
        Commands::Resources { config } => {
            let resources = list_resources(&config)?;
            for (i, resource) in resources.iter().enumerate() {
                println!(
                    "{:>3}. {} {}",
                    i + 1,
                    resource.name.green(),
                    resource.value.bright_black()
                );
            }
        }
    }

    Ok(())
}
