use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gw_config::ConfigUse;
use gw_ingest::StatsSource;

mod commands;
mod render;

use commands::lookup::Request;
use commands::source::FileSource;

#[derive(Parser)]
#[command(name = "gw")]
#[command(about = "Player and guild stats from the Wynncraft public API", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (later files override earlier ones)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Fail instead of warning when a config file carries keys nothing reads
    #[arg(long, global = true, default_value_t = false)]
    strict_config: bool,

    /// Print JSON records instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a player's stats summary
    Stats {
        username: String,

        /// Read the player payload from a file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,

        /// Reference instant for elapsed times (RFC 3339). Defaults to now.
        #[arg(long)]
        now: Option<String>,
    },

    /// List a player's characters
    Characters {
        username: String,

        /// Read the player payload from a file instead of the API
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List the members of a guild who are online right now
    GuildOnline {
        guild: String,

        /// Read the guild payload from a file (requires --online-file)
        #[arg(long, requires = "online_file")]
        guild_file: Option<PathBuf>,

        /// Read the online-players payload from a file (requires --guild-file)
        #[arg(long, requires = "guild_file")]
        online_file: Option<PathBuf>,
    },

    /// Diff two saved guild payloads by member uuid
    RosterDiff {
        /// Earlier guild payload
        #[arg(long)]
        prior: PathBuf,

        /// Later guild payload
        #[arg(long)]
        current: PathBuf,
    },

    /// Poll a guild roster and report joins, departures, renames and rank changes
    Watch {
        /// Guild name. Falls back to watch.guild from config.
        guild: Option<String>,

        /// Poll interval in seconds. Falls back to watch.interval_secs from config.
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Stop after this many polls
        #[arg(long)]
        max_polls: Option<u64>,

        /// Read the guild payload from a file on every poll instead of the API
        #[arg(long)]
        guild_file: Option<PathBuf>,
    },

    /// Print the merged config hash, canonical JSON and effective settings
    ConfigShow,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional local overrides such as GW_API_BASE_URL.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.cmd {
        Commands::Stats {
            username,
            file,
            now,
        } => {
            let now = commands::parse_now(now.as_deref())?;
            let files = file.map(|p| FileSource::new().with_player(p));
            let source = commands::source_for(files, &cli.config_paths, cli.strict_config)?;
            commands::lookup::run(&Request::Stats(username), source.as_ref(), now, json).await?;
        }

        Commands::Characters { username, file } => {
            let now = commands::parse_now(None)?;
            let files = file.map(|p| FileSource::new().with_player(p));
            let source = commands::source_for(files, &cli.config_paths, cli.strict_config)?;
            commands::lookup::run(&Request::Characters(username), source.as_ref(), now, json)
                .await?;
        }

        Commands::GuildOnline {
            guild,
            guild_file,
            online_file,
        } => {
            let now = commands::parse_now(None)?;
            let files = match (guild_file, online_file) {
                (Some(g), Some(o)) => Some(FileSource::new().with_guild(g).with_online(o)),
                _ => None,
            };
            let source = commands::source_for(files, &cli.config_paths, cli.strict_config)?;
            commands::lookup::run(&Request::GuildOnline(guild), source.as_ref(), now, json)
                .await?;
        }

        Commands::RosterDiff { prior, current } => {
            commands::roster_diff::run(&prior, &current, json)?;
        }

        Commands::Watch {
            guild,
            interval_secs,
            max_polls,
            guild_file,
        } => {
            let cfg =
                commands::load_config(&cli.config_paths, ConfigUse::Watch, cli.strict_config)?;
            let guild = guild
                .or_else(|| cfg.app.watch.guild.clone())
                .context("no guild to watch: pass one or set watch.guild in config")?;
            let interval_secs = interval_secs.unwrap_or(cfg.app.watch.interval_secs);
            if interval_secs == 0 {
                anyhow::bail!("--interval-secs must be > 0");
            }
            let opts = commands::watch::WatchOptions {
                guild,
                interval: Duration::from_secs(interval_secs),
                max_polls,
                json,
            };
            tracing::info!(
                config_hash = %cfg.config_hash,
                guild = %opts.guild,
                interval_secs,
                "watch starting"
            );

            let source: Box<dyn StatsSource> = match guild_file {
                Some(path) => Box::new(FileSource::new().with_guild(path)),
                None => Box::new(commands::build_http_source(&cfg.app)?),
            };
            commands::watch::run(source.as_ref(), &opts).await?;
        }

        Commands::ConfigShow => {
            commands::config_show::run(&cli.config_paths, cli.strict_config, json)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    // RUST_LOG controls verbosity. Events go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
