//! Hotelier CLI binary: chat with the hotel finder agent from the command line.
//!
//! `hotelier "Hotels in Athens for 2, July 1-5"` runs one turn; `-i` keeps going in a REPL;
//! `tool list` / `tool show NAME` print the tool definitions given to the model.

mod logging;
mod repl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hotelier::{build_session, ChatTurn, HotelierConfig};
use hotelier_cli::{
    list_tools, load_history, record_turn, render_turn, run_turn, show_tool, CliError,
    ToolShowFormat,
};
use repl::run_repl_loop;
use tracing::debug;

const APP_NAME: &str = "hotelier";

#[derive(Parser, Debug)]
#[command(name = "hotelier")]
#[command(about = "Hotelier: find the best hotel offer by chatting with an agent")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// User message (or pass as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: user message when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Interactive REPL: after the reply, prompt for input and continue the conversation
    #[arg(short, long)]
    interactive: bool,

    /// JSON file with prior turns ([{"role": "user", "content": "..."}, ...]) to replay
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Output JSON: one object per turn; JSON array for tool list; JSON for tool show
    #[arg(long)]
    json: bool,

    /// Verbose: log node and tool call traces (hotelier=debug)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// List or show the tool definitions given to the model
    Tool(ToolArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct ToolArgs {
    #[command(subcommand)]
    sub: ToolCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ToolCommand {
    /// List all tools (name and description)
    List,
    /// Show the full definition of one tool (name, description, input_schema)
    Show(ShowToolArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct ShowToolArgs {
    /// Tool name (e.g. get_best_offer)
    name: String,
    /// Output format: yaml (default) or json
    #[arg(long, value_name = "FORMAT", default_value = "yaml")]
    output: ToolShowFormat,
}

fn exit_with(err: impl std::fmt::Display) -> ! {
    eprintln!("hotelier: {}", err);
    std::process::exit(1);
}

fn run_tool_command(tool: &ToolCommand, json: bool) -> Result<String, CliError> {
    match tool {
        ToolCommand::List => list_tools(json),
        ToolCommand::Show(show) => {
            let format = if json { ToolShowFormat::Json } else { show.output };
            show_tool(&show.name, format)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let report = hotelier_config::load_and_apply(APP_NAME, None)
        .map_err(CliError::from)
        .unwrap_or_else(|e| exit_with(e));
    let _log_guard = logging::init(args.verbose)?;
    debug!(
        from_dotenv = ?report.from_dotenv,
        from_xdg = ?report.from_xdg,
        "configuration files applied"
    );

    if let Some(Command::Tool(ta)) = &args.cmd {
        let out = run_tool_command(&ta.sub, args.json).unwrap_or_else(|e| exit_with(e));
        print!("{}", out);
        if !out.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    let message = args.message.clone().or_else(|| {
        if args.rest.is_empty() {
            None
        } else {
            Some(args.rest.join(" "))
        }
    });
    if !args.interactive && message.is_none() {
        exit_with("provide a message via -m/--message or positional args, or use -i");
    }

    let config = HotelierConfig::from_env()
        .map_err(CliError::from)
        .unwrap_or_else(|e| exit_with(e));
    if args.verbose {
        config.print_summary();
    }
    let session = build_session(&config)
        .await
        .map_err(CliError::from)
        .unwrap_or_else(|e| exit_with(e));

    let mut history: Vec<ChatTurn> = match &args.history {
        Some(path) => load_history(path).unwrap_or_else(|e| exit_with(e)),
        None => Vec::new(),
    };

    if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
        match run_turn(&session, &message, &history).await {
            Ok(output) => {
                println!("{}", render_turn(&output, args.json)?);
                record_turn(&mut history, &message, &output.reply);
            }
            Err(e) if args.interactive => eprintln!("error: {}", e),
            Err(e) => exit_with(e),
        }
    }

    if args.interactive {
        run_repl_loop(&session, &mut history, args.json).await?;
    }
    Ok(())
}
