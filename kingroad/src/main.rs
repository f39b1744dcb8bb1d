//! KingRoad route manager CLI.
//!
//! Keeps the active route and the route history under `--data-dir`
//! (`.kingroad/` by default), so consecutive invocations share one
//! navigation session: `start` in one call, `cancel` in the next.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use kingroad::core::types::{QuickDestination, Route, RouteId};
use kingroad::error::RouteError;
use kingroad::exit_codes;
use kingroad::io::config::{KingroadConfig, load_config, write_config};
use kingroad::io::notify::StderrNotifier;
use kingroad::io::storage::FileStore;
use kingroad::render::Renderer;
use kingroad::store::RouteStore;

const CONFIG_FILE: &str = "config.toml";

type CliStore = RouteStore<FileStore, StderrNotifier>;

#[derive(Parser)]
#[command(
    name = "kingroad",
    version,
    about = "Start, cancel and resume navigation routes"
)]
struct Cli {
    /// Directory holding `config.toml` and the persisted route history.
    #[arg(long, global = true, default_value = ".kingroad")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `<data-dir>/config.toml` with default values if missing.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Start navigating to a destination (prints the new route id).
    Start {
        destination: String,
        /// Starting point; defaults to the current location.
        #[arg(long)]
        origin: Option<String>,
    },
    /// Start navigating to one of the quick destinations.
    Quick {
        #[arg(value_enum)]
        destination: QuickDestination,
    },
    /// Cancel the active route immediately.
    Cancel,
    /// Start a new route copying a history entry.
    Reactivate { id: u64 },
    /// Discard the whole route history.
    Clear,
    /// Show the active route, if any.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// List recent routes, most recent first.
    History {
        /// Number of entries (defaults to `recent_limit` from config).
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Print an HTML fragment for one of the panels.
    Render {
        #[arg(value_enum)]
        view: View,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Navigation,
    History,
    Quick,
}

fn main() {
    kingroad::logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_path();
    if let Command::Init { force } = cli.command {
        return cmd_init(data_dir, force);
    }

    let (config, mut store) = open_store(data_dir)?;
    let code = match cli.command {
        Command::Init { .. } => exit_codes::OK,
        Command::Start {
            destination,
            origin,
        } => report(store.start_route(&destination, origin.as_deref())),
        Command::Quick { destination } => report(store.start_quick_route(destination)),
        Command::Cancel => report(store.cancel_route()),
        Command::Reactivate { id } => report(store.reactivate_route(RouteId(id))),
        Command::Clear => {
            store.clear_history();
            exit_codes::OK
        }
        Command::Status { json } => cmd_status(&store, json)?,
        Command::History { limit, json } => {
            cmd_history(&store, limit.unwrap_or(config.recent_limit), json)?
        }
        Command::Render { view } => cmd_render(&store, &config, view)?,
    };
    Ok(code)
}

fn open_store(data_dir: &Path) -> Result<(KingroadConfig, CliStore)> {
    let config = load_config(&data_dir.join(CONFIG_FILE)).context("load kingroad config")?;
    let store = RouteStore::open(
        FileStore::new(data_dir),
        StderrNotifier,
        config.store_options(),
    )
    .with_estimator(config.estimator());
    Ok((config, store))
}

fn cmd_init(data_dir: &Path, force: bool) -> Result<i32> {
    fs::create_dir_all(data_dir).with_context(|| format!("create {}", data_dir.display()))?;
    let config_path = data_dir.join(CONFIG_FILE);
    if force || !config_path.exists() {
        write_config(&config_path, &KingroadConfig::default())?;
    }
    println!("{}", config_path.display());
    Ok(exit_codes::OK)
}

/// Print the route id on success; rejections were already reported by the notifier.
fn report(result: Result<Route, RouteError>) -> i32 {
    match result {
        Ok(route) => {
            println!("{}", route.id);
            exit_codes::OK
        }
        Err(err) => {
            debug!(error = %err, "route operation rejected");
            exit_codes::REJECTED
        }
    }
}

fn cmd_status(store: &CliStore, json: bool) -> Result<i32> {
    let current = store.current_route();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&current).context("serialize status")?
        );
        return Ok(exit_codes::OK);
    }
    match current {
        Some(route) => println!(
            "navigating: {} {} ({}km, {}min, from {})",
            route.id, route.destination, route.distance_km, route.eta_minutes, route.origin
        ),
        None => println!("idle"),
    }
    Ok(exit_codes::OK)
}

fn cmd_history(store: &CliStore, limit: usize, json: bool) -> Result<i32> {
    let recent = store.recent_history(limit);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&recent).context("serialize history")?
        );
        return Ok(exit_codes::OK);
    }
    for route in recent {
        println!("{}", history_line(route));
    }
    Ok(exit_codes::OK)
}

fn history_line(route: &Route) -> String {
    format!(
        "{}\t{}\t{}\t{}km\t{}",
        route.id,
        route.status.as_str(),
        route.start_time.format("%H:%M"),
        route.distance_km,
        route.destination
    )
}

fn cmd_render(store: &CliStore, config: &KingroadConfig, view: View) -> Result<i32> {
    let renderer = Renderer::new()?;
    let html = match view {
        View::Navigation => renderer.render_navigation(store.current_route())?,
        View::History => renderer.render_history(store.recent_history(config.recent_limit))?,
        View::Quick => renderer.render_quick_destinations()?,
    };
    print!("{html}");
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingroad::core::types::RouteStatus;
    use kingroad::test_support::route;

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["kingroad", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
        assert_eq!(cli.data_dir, PathBuf::from(".kingroad"));
    }

    #[test]
    fn parse_start_with_origin_and_data_dir() {
        let cli = Cli::parse_from([
            "kingroad",
            "start",
            "Salvador",
            "--origin",
            "Feira de Santana",
            "--data-dir",
            "/tmp/kr",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/kr"));
        match cli.command {
            Command::Start {
                destination,
                origin,
            } => {
                assert_eq!(destination, "Salvador");
                assert_eq!(origin.as_deref(), Some("Feira de Santana"));
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn parse_quick_uses_kebab_case_names() {
        let cli = Cli::parse_from(["kingroad", "quick", "gas-station"]);
        assert!(matches!(
            cli.command,
            Command::Quick {
                destination: QuickDestination::GasStation
            }
        ));
    }

    #[test]
    fn report_maps_rejections_to_exit_code() {
        assert_eq!(report(Err(RouteError::NoActiveRoute)), exit_codes::REJECTED);
        assert_eq!(
            report(Ok(route(7, "Natal", RouteStatus::Active))),
            exit_codes::OK
        );
    }

    #[test]
    fn history_line_is_tab_separated() {
        let line = history_line(&route(7, "Natal", RouteStatus::Canceled));
        assert_eq!(line, "7\tcanceled\t12:00\t100km\tNatal");
    }
}
