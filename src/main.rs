//! watchdiff - colorized diffs of Kubernetes watch events.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufRead, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use watchdiff::config::{ConfigLoader, ContextLines, DiffMode, Granularity, WatchConfig};
use watchdiff::watch::{self, LineReader, Processor};

/// Read buffer for the input stream; lines longer than this still work.
const READ_BUFFER_BYTES: usize = 1 << 20;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Token,
    Unified,
}

impl From<ModeArg> for DiffMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Token => DiffMode::Token,
            ModeArg::Unified => DiffMode::Unified,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "watchdiff",
    about = "Colorized diffs of Kubernetes watch events",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to ./.watchdiff.toml, then the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render watch events read as JSON lines.
    ///
    /// Feed it `kubectl get <resource> -o json --output-watch-events --watch`.
    WatchChanges {
        /// Read events from a file instead of stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Diff mode for MODIFIED events.
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
        /// Unified diff context lines; -1 shows the whole object.
        #[arg(short = 'U', long, allow_negative_numbers = true)]
        context: Option<ContextLines>,
        /// Diff words instead of characters in token mode.
        #[arg(long)]
        words: bool,
        /// Print the full object on ADDED events.
        #[arg(long)]
        body_on_added: bool,
        /// Do not shorten long unchanged spans.
        #[arg(long)]
        no_ellipsis: bool,
        /// Re-indent JSON before diffing.
        #[arg(long)]
        pretty: bool,
        /// Disable colored output.
        #[arg(long)]
        no_color: bool,
    },
    /// Print the effective configuration as TOML.
    ShowConfig,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<WatchConfig, watchdiff::config::ConfigError> {
    let loader = path.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let mut config = loader.load()?;
    config.apply_process_env()?;
    Ok(config)
}

async fn watch_stream<R>(reader: R, config: &WatchConfig) -> Result<(), watch::WatchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut reader = LineReader::new(reader, config.max_line_bytes);
    let mut processor = Processor::new(config);
    let mut out = std::io::stdout().lock();
    watch::run(&mut reader, &mut processor, &mut out).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("watchdiff: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::WatchChanges {
            input,
            mode,
            context,
            words,
            body_on_added,
            no_ellipsis,
            pretty,
            no_color,
        } => {
            if let Some(mode) = mode {
                config.diff_mode = mode.into();
            }
            if let Some(context) = context {
                config.context_lines = context;
            }
            if words {
                config.granularity = Granularity::Words;
            }
            config.body_on_added |= body_on_added;
            config.no_ellipsis |= no_ellipsis;
            config.pretty_before_diff |= pretty;
            config.color &= !no_color;

            tracing::info!(
                input = ?input,
                diff_mode = ?config.diff_mode,
                context = %config.context_lines,
                "Starting watch-changes"
            );

            let result = match input {
                Some(path) => match tokio::fs::File::open(&path).await {
                    Ok(file) => {
                        watch_stream(BufReader::with_capacity(READ_BUFFER_BYTES, file), &config)
                            .await
                    }
                    Err(e) => {
                        eprintln!("watchdiff: cannot open {}: {e}", path.display());
                        return ExitCode::FAILURE;
                    }
                },
                None => {
                    let stdin = tokio::io::stdin();
                    watch_stream(BufReader::with_capacity(READ_BUFFER_BYTES, stdin), &config).await
                }
            };

            if let Err(e) = result {
                tracing::error!(error = %e, "watch-changes stopped");
                eprintln!("watchdiff: {e}");
                return ExitCode::FAILURE;
            }
        }
        Commands::ShowConfig => match toml::to_string_pretty(&config) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("watchdiff: {e}");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
