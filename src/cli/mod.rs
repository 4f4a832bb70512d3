pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ConverterArgs};
pub use commands::run;
