//! Binary entrypoint for the KrishiQuest CLI.
//!
//! Commands:
//! - `start [--port <port>]` - run the REST server
//! - `init` - create a starter `config.toml`
//! - `status` - print record counts for the configured store
//!
//! See the library crate docs for module-level details: `krishiquest::`.
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use krishiquest::api::create_router;
use krishiquest::config::Config;
use krishiquest::game::GameStoreBuilder;

#[derive(Parser)]
#[command(name = "krishiquest")]
#[command(about = "A gamified farming-education REST backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST server
    Start {
        /// HTTP port (overrides the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Initialize a new configuration file
    Init,
    /// Show store record counts
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes it)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Start { port } => {
            let config = pre_config.unwrap_or(Config::load(&cli.config).await?);
            info!("Starting KrishiQuest v{}", env!("CARGO_PKG_VERSION"));

            let store = GameStoreBuilder::new(&config.storage.data_dir)
                .with_seed_dir(&config.storage.seed_dir)
                .open()?;
            let counts = store.counts();
            info!(
                "Store opened at {} ({} quests, {} schemes, {} market prices in catalog)",
                config.storage.data_dir, counts.quests, counts.schemes, counts.market_prices
            );

            let app = create_router(Arc::new(store));
            let addr: SocketAddr = format!(
                "{}:{}",
                config.server.host,
                port.unwrap_or(config.server.port)
            )
            .parse()?;
            info!("API listening on http://{}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::Init => {
            info!("Initializing new KrishiQuest configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);

            let config = Config::load(&cli.config).await?;
            tokio::fs::create_dir_all(&config.storage.data_dir).await?;
            info!(
                "Data directory ready at {}; seed catalogs are read from {}",
                config.storage.data_dir, config.storage.seed_dir
            );
        }
        Commands::Status => {
            let config = pre_config.unwrap_or(Config::load(&cli.config).await?);
            let store = GameStoreBuilder::new(&config.storage.data_dir).open()?;
            let counts = store.counts();
            println!("KrishiQuest store at {}", config.storage.data_dir);
            println!("  users:          {}", counts.users);
            println!("  farms:          {}", counts.farms);
            println!("  quests:         {}", counts.quests);
            println!("  user quests:    {}", counts.user_quests);
            println!("  schemes:        {}", counts.schemes);
            println!("  user schemes:   {}", counts.user_schemes);
            println!("  market prices:  {}", counts.market_prices);
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => match config.as_ref().map(|c| c.logging.level.as_str()) {
            Some("trace") => log::LevelFilter::Trace,
            Some("debug") => log::LevelFilter::Debug,
            Some("warn") => log::LevelFilter::Warn,
            Some("error") => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        },
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    if let Some(file) = config.as_ref().and_then(|c| c.logging.file.clone()) {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // When stdout is a terminal, echo log lines to the console as well
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        } else {
            builder.format(default_log_format);
        }
    } else {
        builder.format(default_log_format);
    }
    let _ = builder.try_init();
}

fn default_log_format(
    fmt: &mut env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    use std::io::Write;
    writeln!(
        fmt,
        "{} [{}] {}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
        record.level(),
        record.args()
    )
}
