mod commands;
pub mod exit_codes;
mod output;

pub use commands::{Cli, Commands};

use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    commands::execute(cli)
}
