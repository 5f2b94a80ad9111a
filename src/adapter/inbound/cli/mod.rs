//! CLI module graph.

pub mod check;
pub mod command;
pub mod dispatch;
pub mod once;
pub mod output;
pub mod run;
