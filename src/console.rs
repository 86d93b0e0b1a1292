//! Minimal terminal renderer attached to the sync handle.
//!
//! Prints the board on every view-model change and turns stdin lines into
//! the two write-back commands (refresh now, select league).

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::models::ViewModel;
use crate::scheduler::{SchedulerPhase, SyncHandle};

const HELP: &str = "commands: r = refresh, l <league> = filter, a = all leagues, q = quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Refresh,
    SelectLeague(Option<String>),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    match word.to_lowercase().as_str() {
        "r" | "refresh" => Some(Command::Refresh),
        "l" | "league" if !rest.is_empty() => Some(Command::SelectLeague(Some(rest.to_string()))),
        "a" | "all" => Some(Command::SelectLeague(None)),
        "h" | "help" | "?" => Some(Command::Help),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Text board for one view model.
fn render(vm: &ViewModel) -> Vec<String> {
    let mut out = Vec::new();

    match &vm.selected_league {
        Some(league) => out.push(format!("== Live Matches: {} ==", league)),
        None => out.push("== Live Matches ==".to_string()),
    }
    if vm.is_loading {
        out.push("Loading live scores...".to_string());
    }
    if let Some(err) = &vm.last_error {
        out.push(format!("! {}", err.message));
    }

    let visible = vm.visible_matches();
    if visible.is_empty() && !vm.is_loading {
        out.push("No live matches".to_string());
    }
    for m in visible {
        out.push(format!(
            "{:>22}  {:^7}  {:<22} [{}]  {}",
            m.home_team,
            m.scoreline(),
            m.away_team,
            m.status_label(),
            m.league
        ));
    }

    if !vm.leagues.is_empty() {
        let labels: Vec<String> = vm.leagues.iter().map(|l| l.display_label()).collect();
        out.push(format!("Leagues: {}", labels.join(", ")));
    }
    if let Some(err) = &vm.leagues_error {
        out.push(format!("! {}", err.message));
    }
    if let Some(at) = vm.last_updated {
        out.push(format!("updated {}", at.format("%H:%M:%S UTC")));
    }
    out
}

/// Run until the user quits or the scheduler stops.
pub async fn run(handle: SyncHandle) {
    let mut view_rx = handle.subscribe();
    let mut phase_rx = handle.subscribe_phase();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("{}", HELP);
    for line in render(&view_rx.borrow_and_update()) {
        println!("{}", line);
    }

    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let vm = view_rx.borrow_and_update().clone();
                for line in render(&vm) {
                    println!("{}", line);
                }
            }
            changed = phase_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let phase = *phase_rx.borrow_and_update();
                info!("Sync phase: {:?}", phase);
                if phase == SchedulerPhase::Stopped {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match parse_command(&line) {
                        Some(Command::Refresh) => {
                            let h = handle.clone();
                            tokio::spawn(async move {
                                if let Err(e) = h.refresh_now().await {
                                    warn!("Refresh rejected: {}", e);
                                }
                            });
                        }
                        Some(Command::SelectLeague(league)) => {
                            handle.select_league(league.as_deref())
                        }
                        Some(Command::Help) => println!("{}", HELP),
                        Some(Command::Quit) => break,
                        None if line.trim().is_empty() => {}
                        None => println!("unknown command '{}'; {}", line.trim(), HELP),
                    },
                    Ok(None) => {
                        info!("stdin closed; rendering only");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        stdin_open = false;
                    }
                }
            }
        }
    }
}
