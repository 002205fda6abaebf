use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};

use fantasy_gateway::aggregator::ViewModel;
use fantasy_gateway::client::{
    ActionPipeline, GatewayClient, ModalEvent, ModalKind, ModalView, Overlay, Settlement,
    Severity, ToastId, UserAction, ViewRefresher, DEFAULT_RELOAD_DELAY,
};
use fantasy_gateway::config::ObservabilityConfig;
use fantasy_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Terminal front end for the fantasy gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a player to a team (asks for the cost)
    AddPlayer {
        #[arg(long)]
        team: String,
        #[arg(long)]
        player: String,
        /// Roster slot, e.g. QB or FLEX
        #[arg(long)]
        position: Option<String>,
    },
    /// Remove a player from a team (asks for confirmation)
    RemovePlayer {
        #[arg(long)]
        team: String,
        #[arg(long)]
        player: String,
    },
    /// Move a player into the starting lineup
    Start {
        #[arg(long)]
        team: String,
        #[arg(long)]
        player: String,
    },
    /// Move a player to the bench
    Bench {
        #[arg(long)]
        team: String,
        #[arg(long)]
        player: String,
    },
    /// Print a page's view model, e.g. `view /team/12`
    View { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&ObservabilityConfig {
        log_level: cli.log_level.clone(),
        ..Default::default()
    });

    let client = GatewayClient::new(&cli.url)?;

    let (action, team_id) = match cli.command {
        Commands::View { path } => {
            let model = client.fetch_view(&path).await?;
            println!("{}", serde_json::to_string_pretty(&model)?);
            return Ok(());
        }
        Commands::AddPlayer {
            team,
            player,
            position,
        } => (
            UserAction::AddPlayer {
                team_id: team.clone(),
                player_id: player,
                position_on_team: position,
            },
            team,
        ),
        Commands::RemovePlayer { team, player } => (
            UserAction::RemovePlayer {
                team_id: team.clone(),
                player_id: player,
            },
            team,
        ),
        Commands::Start { team, player } => (
            UserAction::SetStarter {
                team_id: team.clone(),
                player_id: player,
                is_starter: true,
            },
            team,
        ),
        Commands::Bench { team, player } => (
            UserAction::SetStarter {
                team_id: team.clone(),
                player_id: player,
                is_starter: false,
            },
            team,
        ),
    };

    let overlay = Overlay::default();
    let refresher = Arc::new(ViewRefresher::new(client.clone(), format!("/team/{team_id}")));
    let pipeline = ActionPipeline::new(Arc::new(client), refresher.clone(), overlay);

    let settlement = drive(&pipeline, action).await?;

    if settlement == Settlement::Succeeded {
        let wait = DEFAULT_RELOAD_DELAY + Duration::from_secs(10);
        match tokio::time::timeout(wait, refresher.updated()).await {
            Ok(Some(model)) => print_summary(refresher.path(), &model),
            Ok(None) => eprintln!("Could not refresh {}", refresher.path()),
            Err(_) => eprintln!("Timed out refreshing {}", refresher.path()),
        }
    }

    Ok(())
}

/// Run one action, answering its modals from stdin.
async fn drive(
    pipeline: &ActionPipeline,
    action: UserAction,
) -> Result<Settlement, Box<dyn std::error::Error>> {
    let overlay = pipeline.overlay().clone();
    let mut modal_rx = overlay.modals.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = HashSet::new();

    let runner = pipeline.clone();
    let mut run = tokio::spawn(async move { runner.run(action).await });

    loop {
        tokio::select! {
            report = &mut run => {
                print_toasts(&overlay, &mut shown);
                return Ok(report?.settlement);
            }
            changed = modal_rx.changed() => {
                if changed.is_err() {
                    continue;
                }
                let view = modal_rx.borrow_and_update().clone();
                print_toasts(&overlay, &mut shown);

                let Some(view) = view else { continue };
                print_modal(&view);
                let line = lines.next_line().await?;
                for event in answer(&view, line) {
                    overlay.modals.dispatch(event);
                }
            }
        }
    }
}

/// Map a typed line to modal events. `esc` or end of input backs out.
fn answer(view: &ModalView, line: Option<String>) -> Vec<ModalEvent> {
    let Some(line) = line else {
        return vec![ModalEvent::Escape];
    };
    let line = line.trim();
    if line.eq_ignore_ascii_case("esc") {
        return vec![ModalEvent::Escape];
    }

    match view.kind {
        ModalKind::Confirm if line.eq_ignore_ascii_case("y") || line.eq_ignore_ascii_case("yes") => {
            vec![ModalEvent::Confirm]
        }
        ModalKind::Confirm => vec![ModalEvent::Cancel],
        // Empty line keeps the prefilled value.
        ModalKind::Prompt if line.is_empty() => vec![ModalEvent::Enter],
        ModalKind::Prompt => vec![ModalEvent::Input(line.to_string()), ModalEvent::Enter],
    }
}

fn print_modal(view: &ModalView) {
    println!("== {} ==", view.title);
    match view.kind {
        ModalKind::Confirm => {
            if let Some(message) = &view.message {
                println!("{message}");
            }
            println!("[y/N, esc]");
        }
        ModalKind::Prompt => println!("[{}] (esc to cancel)", view.input),
    }
}

fn print_toasts(overlay: &Overlay, shown: &mut HashSet<ToastId>) {
    for toast in overlay.toasts.entries() {
        if shown.insert(toast.id) {
            let marker = match toast.severity {
                Severity::Info => "i",
                Severity::Success => "+",
                Severity::Error => "!",
            };
            println!("[{marker}] {}", toast.message);
        }
    }
}

fn print_summary(path: &str, model: &ViewModel) {
    println!("-- {path} --");
    if let Some(error) = model.error() {
        println!("error: {error}");
    }
    for (name, value) in model.slots() {
        match value {
            Value::Array(items) => println!("{name}: {} entries", items.len()),
            Value::Object(fields) => {
                let label = fields
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("(unnamed)");
                println!("{name}: {label}");
            }
            Value::Null => println!("{name}: -"),
            other => println!("{name}: {other}"),
        }
    }
}
