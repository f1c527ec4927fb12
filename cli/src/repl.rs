//! Interactive REPL: read stdin, run one turn, print the reply, repeat until EOF or quit.
//!
//! Sessions are stateless, so the REPL owns the history and replays it on every turn.
//! A failed turn is reported and leaves the history unchanged.

use std::io::Write;

use hotelier::{ChatTurn, HotelFinderSession};
use hotelier_cli::{record_turn, render_turn, run_turn};
use tokio::io::{AsyncBufReadExt, BufReader};

fn is_quit_command(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    matches!(lower.as_str(), "quit" | "exit" | "/quit" | "/exit")
}

/// Runs the loop. Exits on EOF (Ctrl+D) or `quit`/`exit`/`/quit`/`/exit`.
pub async fn run_repl_loop(
    session: &HotelFinderSession,
    history: &mut Vec<ChatTurn>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match reader.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        match run_turn(session, &line, history).await {
            Ok(output) => {
                println!("{}", render_turn(&output, json)?);
                record_turn(history, &line, &output.reply);
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }

    println!("Bye.");
    Ok(())
}
