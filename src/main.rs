//! Command-line client and entry point.
//!
//! A thin shell around the library: reads one command per line from stdin,
//! translates it into an [`Event`], and prints the shelf after every change.
//!
//! ```text
//! ┌─────────────────────────┐
//! │   current-thread tokio  │
//! │  ┌──────────────────┐   │
//! │  │  stdin reader    │───┼──→ Event queue
//! │  └──────────────────┘   │         │
//! │  ┌──────────────────┐   │         ▼
//! │  │  Driver          │←──┼── timers / remote tasks
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Startup
//!
//! 1. Load configuration from the first argument, `$SHELFSYNC_CONFIG`, or
//!    `<data_dir>/config.toml`, then apply environment overrides
//! 2. Initialize tracing
//! 3. Open the credential file and build the HTTP client
//! 4. Begin a session if a credential is stored
//!
//! # Commands
//!
//! - `list [status]`: filter the shelf (`all`, `want_to_read`, `reading`, `read`)
//! - `reload`: reload with the current filter
//! - `add` / `edit <id>` / `cancel`: open or close the form
//! - `search <text>`: type into the catalog search box
//! - `pick <n>` / `change`: select a search result or drop the selection
//! - `status <s>` / `rating <n>` / `notes <text>`: edit the draft
//! - `save`: submit the form
//! - `delete <id>`: remove an entry
//! - `token <value>` / `logout`: sign in or out
//! - `help`, `quit`

#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

use shelfsync::domain::{EntryId, ReadingStatus};
use shelfsync::observability::{init_tracing, TracingWarningSink};
use shelfsync::remote::HttpShelfApi;
use shelfsync::runtime::Driver;
use shelfsync::storage::{CredentialStore, JsonCredentialStore, Session};
use shelfsync::{infrastructure, initialize, Config, Event, Result, ShelfError, ShelfSyncController};

const HELP: &str = "\
commands:
  list [status]      filter the shelf (all, want_to_read, reading, read)
  reload             reload the shelf
  add                open the add form
  edit <id>          open the edit form for an entry
  search <text>      search the catalog
  pick <n>           select search result n
  change             drop the selected book
  status <s>         set the reading status
  rating <n>         set the rating (1-5, blank clears)
  notes <text>       set the notes
  save               submit the form
  cancel             close the form
  delete <id>        remove an entry
  token <value>      sign in with a bearer token
  logout             sign out and forget the stored token
  quit";

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Event(Event),
    SignIn(String),
    SignOut,
    Help,
}

fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let arg = rest.trim();

    let event = match word {
        "list" => Event::SetFilter(arg.parse()?),
        "reload" => Event::Reload,
        "add" => Event::OpenCreate,
        "edit" => Event::OpenEdit(parse_id(arg)?),
        "search" => Event::QueryChanged(rest.trim_end_matches(['\r', '\n']).to_string()),
        "pick" => Event::SelectResult(
            arg.parse()
                .map_err(|_| format!("expected a result number, got {arg:?}"))?,
        ),
        "change" => Event::ClearSelection,
        "status" => Event::SetStatus(arg.parse::<ReadingStatus>()?),
        "rating" => Event::SetRatingInput(arg.to_string()),
        "notes" => Event::SetNotes(arg.to_string()),
        "save" => Event::Submit,
        "cancel" => Event::CancelForm,
        "delete" => Event::Delete(parse_id(arg)?),
        "quit" | "exit" => Event::Quit,
        "token" if !arg.is_empty() => return Ok(Some(Command::SignIn(arg.to_string()))),
        "token" => return Err("usage: token <value>".to_string()),
        "logout" => return Ok(Some(Command::SignOut)),
        "help" | "?" => return Ok(Some(Command::Help)),
        other => return Err(format!("unknown command {other:?}, try `help`")),
    };
    Ok(Some(Command::Event(event)))
}

fn parse_id(arg: &str) -> std::result::Result<EntryId, String> {
    arg.parse().map_err(|_| format!("expected an entry id, got {arg:?}"))
}

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SHELFSYNC_CONFIG").ok())
        .map_or_else(
            || infrastructure::get_data_dir(&Config::default()).join("config.toml"),
            PathBuf::from,
        )
}

/// Forwards stdin commands to the driver until EOF or `quit`.
async fn read_commands(events: UnboundedSender<Event>, credentials: Arc<dyn CredentialStore>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "failed to read stdin");
                break;
            }
        };

        let event = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Event(event))) => event,
            Ok(Some(Command::SignIn(token))) => match credentials.set(&token) {
                Ok(()) => Event::SessionStarted,
                Err(e) => {
                    eprintln!("! {e}");
                    continue;
                }
            },
            Ok(Some(Command::SignOut)) => {
                // The controller only clears the credential of an active session.
                if let Err(e) = credentials.clear() {
                    eprintln!("! {e}");
                }
                Event::SessionEnded
            }
            Ok(Some(Command::Help)) => {
                println!("{HELP}");
                continue;
            }
            Err(message) => {
                eprintln!("! {message}");
                continue;
            }
        };

        let quit = event == Event::Quit;
        if events.send(event).is_err() || quit {
            return;
        }
    }
    let _ = events.send(Event::Quit);
}

fn print_view(controller: &ShelfSyncController) {
    print!("{}", shelfsync::ui::render(controller));
}

fn report(error: &ShelfError) {
    eprintln!("! {error}");
}

fn run() -> Result<()> {
    let config = Config::load(&config_path())?.apply_env();
    init_tracing(&config);

    let credentials: Arc<dyn CredentialStore> = Arc::new(JsonCredentialStore::new(
        infrastructure::credentials_file(&config),
    )?);
    let session = Session::new(Arc::clone(&credentials));
    let api = HttpShelfApi::new(&config.api_base_url, Arc::clone(&credentials))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();

    local.block_on(&runtime, async move {
        let mut driver = Driver::new(
            initialize(&config),
            api,
            Box::new(session),
            Box::new(TracingWarningSink),
        );
        tokio::task::spawn_local(read_commands(driver.sender(), credentials));

        match driver.start() {
            Ok(_) => print_view(driver.controller()),
            Err(e) => report(&e),
        }
        driver.run(print_view, report).await;
    });

    // A pending stdin read would otherwise hold the runtime open.
    drop(local);
    runtime.shutdown_background();
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("shelfsync: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfsync::domain::StatusFilter;

    fn event(line: &str) -> Event {
        match parse_command(line) {
            Ok(Some(Command::Event(event))) => event,
            other => panic!("expected an event for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn list_parses_filters() {
        assert_eq!(event("list"), Event::SetFilter(StatusFilter::All));
        assert_eq!(
            event("list reading"),
            Event::SetFilter(StatusFilter::Only(ReadingStatus::Reading))
        );
        assert!(parse_command("list shelved").is_err());
    }

    #[test]
    fn search_keeps_inner_whitespace() {
        assert_eq!(event("search  the hobbit "), Event::QueryChanged(" the hobbit ".into()));
        assert_eq!(event("search"), Event::QueryChanged(String::new()));
    }

    #[test]
    fn rating_input_is_passed_through_raw() {
        assert_eq!(event("rating 4.5"), Event::SetRatingInput("4.5".into()));
        assert_eq!(event("rating"), Event::SetRatingInput(String::new()));
    }

    #[test]
    fn ids_and_indices_must_be_numeric() {
        assert_eq!(event("delete 12"), Event::Delete(EntryId(12)));
        assert_eq!(event("pick 0"), Event::SelectResult(0));
        assert!(parse_command("edit twelve").is_err());
        assert!(parse_command("pick -1").is_err());
    }

    #[test]
    fn session_commands() {
        assert_eq!(parse_command("token abc"), Ok(Some(Command::SignIn("abc".into()))));
        assert!(parse_command("token").is_err());
        assert_eq!(parse_command("logout"), Ok(Some(Command::SignOut)));
        assert!(parse_command("frobnicate").is_err());
    }
}
