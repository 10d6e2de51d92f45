//! # Read-Eval-Print Loop
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  prompt ──► read line ──► Command::parse ──┬── Err → "!! usage ..."    │
//! │    ▲                                       │                            │
//! │    │                                       └── Ok  → dispatch::execute  │
//! │    │                                                   │                │
//! │    └────────────── print ◄─────────────────────────────┤                │
//! │                                                        │                │
//! │                      EOF or quit ──► flush mirror ──► return            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use crate::command::{Command, ParseError};
use crate::dispatch::{self, Outcome};
use cyber_session::{SessionPhase, SessionStore};

const BANNER: &str = "\
CYBER_MARKET // AUTHENTICATION OPTIONAL
type 'help' for commands";

fn prompt(store: &SessionStore) -> String {
    match (store.phase(), store.user()) {
        (SessionPhase::Authenticated, Some(user)) => format!("{}@cyber_market> ", user.username),
        _ => "guest@cyber_market> ".to_string(),
    }
}

/// Runs until `quit` or end of input, then waits for pending mirror writes.
pub async fn run<R, W>(store: &mut SessionStore, input: R, output: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(output, "{}", BANNER)?;

    let mut lines = input.lines();

    loop {
        write!(output, "{}", prompt(store))?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            break;
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                writeln!(output, "!! {}", e)?;
                continue;
            }
        };

        match dispatch::execute(store, command).await {
            Outcome::Print(text) => writeln!(output, "{}", text)?,
            Outcome::Quit => break,
        }
    }

    store.flush().await;
    info!("Terminal session ended");
    writeln!(output, "DISCONNECTED.")?;
    Ok(())
}
