//! Hotelier CLI library: turn orchestration and tool inspection for the `hotelier` binary.
//!
//! The binary owns argument parsing, logging and the REPL; everything that can be
//! exercised without a terminal lives here.

pub mod run;
pub mod tool_cmd;

pub use run::{load_history, record_turn, render_turn, run_turn, CliError, TurnOutput};
pub use tool_cmd::{list_tools, show_tool, ToolShowFormat};
