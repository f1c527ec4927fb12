//! State graph: nodes plus edges, compiled into an executable state machine.
//!
//! The agent loop is a two-node graph (`think` ⇄ `act`) with a conditional edge out
//! of `think`. Nodes run strictly one at a time; each receives the full state and
//! returns the full state.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod next;
mod node;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, StateObserver};
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use next::Next;
pub use node::Node;
pub use state_graph::{StateGraph, END, START};
