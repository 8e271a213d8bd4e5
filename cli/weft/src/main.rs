//! weft CLI: generate Haskell bindings from an API description.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "weft", version, about = "Haskell binding generator for C libraries")]
struct Cli {
    /// Log level (overridden by -v)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,
    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate foreign imports, wrappers and constants for a module
    Generate {
        /// API description file (.api.toml)
        #[arg(long)]
        api: PathBuf,
        /// Naming configuration (weft.toml)
        #[arg(long)]
        config: PathBuf,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Resolve a single qualified name to its identifier
    Resolve {
        /// Qualified name, e.g. Gtk.widget_show
        name: String,
        /// Identifier style
        #[arg(long, value_enum, default_value_t = StyleArg::Value)]
        style: StyleArg,
        /// Naming configuration (weft.toml)
        #[arg(long)]
        config: PathBuf,
    },
    /// Check that a description and configuration generate cleanly
    Check {
        /// API description file (.api.toml)
        #[arg(long)]
        api: PathBuf,
        /// Naming configuration (weft.toml)
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Value,
    Type,
}

impl From<StyleArg> for weft_codegen::Style {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Value => weft_codegen::Style::Value,
            StyleArg::Type => weft_codegen::Style::Type,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        cli.log_level.into()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .filter_level(level)
        .init();

    let result = run(cli.command);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            api,
            config,
            output,
            format,
        } => commands::generate::run(&api, &config, output.as_deref(), format),
        Commands::Resolve {
            name,
            style,
            config,
        } => {
            let ident = commands::resolve::run(&name, style.into(), &config)?;
            println!("{ident}");
            Ok(())
        }
        Commands::Check { api, config } => commands::check::run(&api, &config),
    }
}
