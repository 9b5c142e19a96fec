// renders the ruleframe(1) man page from the clap definition into man/

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_mangen::Man;
use ruleframe::cli::Cli;

fn main() -> Result<()> {
    let dir = Path::new("man");
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut page = Vec::new();
    Man::new(Cli::command())
        .render(&mut page)
        .context("rendering man page")?;

    let target = dir.join("ruleframe.1");
    fs::write(&target, page).with_context(|| format!("writing {}", target.display()))?;

    println!("Generated {}", target.display());
    Ok(())
}
