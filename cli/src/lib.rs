pub mod commands;
pub mod repl;

pub use repl::readline;
