use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use strsim::levenshtein;

use std::io;
use std::path::{Path, PathBuf};

use crate::config::{self, LayoutFile};
use crate::controller::{LayoutController, LayoutHost, MemoryContainer, ViewId};
use crate::geometry::Size;

use super::exit_codes;
use super::output::{
    self, ExplainData, ExplainedChild, FrameData, JsonRpcError, OrderData, OrderedChild,
    OutputMode, PlaceData, PlacedChild, RuleData, VerifyData,
};

#[derive(Parser)]
#[command(name = "ruleframe")]
#[command(about = "Evaluate conditional layout rules against a container size")]
#[command(version)]
pub struct Cli {
    /// Path to layout file (overrides RULEFRAME_LAYOUT env var and default location)
    #[arg(long, global = true)]
    pub layout: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log rule evaluation and placement to stderr (RULEFRAME_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a layout pass and print each child's frame
    Place {
        /// Container size (e.g. 800x600), defaults to the layout file's container
        #[arg(short, long)]
        size: Option<String>,
    },

    /// Re-attach children by z-index and print the resulting order
    Order,

    /// Show which rule wins for each child
    Explain {
        /// Container size (e.g. 800x600), defaults to the layout file's container
        #[arg(short, long)]
        size: Option<String>,

        /// Only explain this child
        #[arg(short, long)]
        child: Option<String>,
    },

    /// Validate the layout file
    Verify,

    /// Print a shell completion script
    Completions {
        /// Target shell: bash, zsh, fish, elvish, powershell
        shell: String,
    },
}

/// a command failure carrying its exit code
struct Failure {
    code: i32,
    message: String,
    suggestions: Vec<String>,
    details: Vec<String>,
}

impl Failure {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestions: Vec::new(),
            details: Vec::new(),
        }
    }

    fn report(self, mode: OutputMode) -> ! {
        if mode.is_json() {
            let error = JsonRpcError::new(self.code, self.message)
                .with_suggestions(self.suggestions)
                .with_details(self.details);
            output::print_json_error(&error);
        } else {
            eprintln!("error: {}", self.message);
            for detail in &self.details {
                eprintln!("  {}", detail);
            }
            if !self.suggestions.is_empty() {
                eprintln!("did you mean: {}?", self.suggestions.join(", "));
            }
        }
        std::process::exit(self.code);
    }
}

impl From<config::LayoutFileError> for Failure {
    fn from(e: config::LayoutFileError) -> Self {
        Failure::new(exit_codes::CONFIG_ERROR, e.to_string())
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);
    let layout_path = config::layout_path(cli.layout.as_deref());

    let result = match cli.command {
        Commands::Place { size } => place(&layout_path, size.as_deref(), output_mode),
        Commands::Order => order(&layout_path, output_mode),
        Commands::Explain { size, child } => {
            explain(&layout_path, size.as_deref(), child.as_deref(), output_mode)
        }
        Commands::Verify => verify(&layout_path, output_mode),
        Commands::Completions { shell } => completions(&shell),
    };

    match result {
        Ok(()) => Ok(()),
        Err(failure) => failure.report(output_mode),
    }
}

fn parse_size(size: Option<&str>) -> Result<Option<Size>, Failure> {
    size.map(|s| {
        Size::parse(s)
            .map_err(|e| Failure::new(exit_codes::INVALID_ARGS, format!("--size: {}", e)))
    })
    .transpose()
}

fn load_controller(
    path: &Path,
    size: Option<Size>,
) -> Result<LayoutController<MemoryContainer>, Failure> {
    let layout = config::load(path)?;
    Ok(layout.build(size)?)
}

fn child_name(controller: &LayoutController<MemoryContainer>, id: ViewId) -> String {
    controller
        .host()
        .name(id)
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(str::len).max().unwrap_or(0)
}

// ==================== Commands ====================

fn place(path: &Path, size: Option<&str>, mode: OutputMode) -> Result<(), Failure> {
    let size = parse_size(size)?;
    let mut controller = load_controller(path, size)?;
    controller.layout_control();

    let host = controller.host();
    let frames: Vec<_> = host
        .subviews()
        .into_iter()
        .map(|id| (child_name(&controller, id), host.frame(id)))
        .collect();

    match mode {
        OutputMode::Quiet => {}
        OutputMode::Json => {
            let data = PlaceData {
                size: host.bound_size(),
                children: frames
                    .into_iter()
                    .map(|(id, frame)| PlacedChild {
                        id,
                        frame: frame.map(FrameData::from),
                    })
                    .collect(),
            };
            output::print_json(&data);
        }
        OutputMode::Text => {
            let width = name_width(frames.iter().map(|(id, _)| id.as_str()));
            for (id, frame) in &frames {
                match frame {
                    Some(rect) => println!("{:<width$}  {}", id, rect, width = width),
                    None => println!("{:<width$}  unplaced", id, width = width),
                }
            }
        }
    }

    Ok(())
}

fn order(path: &Path, mode: OutputMode) -> Result<(), Failure> {
    let mut controller = load_controller(path, None)?;
    controller.reload_subviews();

    let data = OrderData {
        children: controller
            .host()
            .subviews()
            .into_iter()
            .map(|id| OrderedChild {
                id: child_name(&controller, id),
                z_index: controller.z_index_info().effective_z_index(&id),
            })
            .collect(),
    };

    match mode {
        OutputMode::Quiet => {}
        OutputMode::Json => output::print_json(&data),
        OutputMode::Text => {
            let width = name_width(data.children.iter().map(|c| c.id.as_str()));
            for child in &data.children {
                println!("{:<width$}  z={}", child.id, child.z_index, width = width);
            }
        }
    }

    Ok(())
}

fn explain(
    path: &Path,
    size: Option<&str>,
    only: Option<&str>,
    mode: OutputMode,
) -> Result<(), Failure> {
    let size = parse_size(size)?;
    let controller = load_controller(path, size)?;
    let host = controller.host();
    let size = host.bound_size();

    let targets = match only {
        Some(name) => match host.find(name) {
            Some(id) => vec![id],
            None => {
                let mut failure = Failure::new(
                    exit_codes::UNKNOWN_CHILD,
                    format!("unknown child '{}'", name),
                );
                failure.suggestions = suggest(name, &host.names());
                return Err(failure);
            }
        },
        None => host.subviews(),
    };

    let children = targets
        .into_iter()
        .map(|id| {
            let rules = controller.layout_info().rules(&id).unwrap_or(&[]);
            let winner = controller.layout_info().matching_index(&id, size);
            ExplainedChild {
                id: child_name(&controller, id),
                winner,
                frame: winner.map(|i| FrameData::from(rules[i].position.resolve(size))),
                rules: rules
                    .iter()
                    .enumerate()
                    .map(|(index, rule)| RuleData {
                        index,
                        when: rule.condition.to_string(),
                        position: rule.position.to_string(),
                        matched: rule.matches(size),
                    })
                    .collect(),
            }
        })
        .collect();

    let data = ExplainData { size, children };

    match mode {
        OutputMode::Quiet => {}
        OutputMode::Json => output::print_json(&data),
        OutputMode::Text => {
            println!("container {}", data.size);
            for child in &data.children {
                match child.winner {
                    Some(index) => println!("{}: rule {} wins", child.id, index),
                    None if child.rules.is_empty() => println!("{}: no rules", child.id),
                    None => println!("{}: no rule matches", child.id),
                }
                for rule in &child.rules {
                    let marker = if Some(rule.index) == child.winner {
                        '*'
                    } else if rule.matched {
                        '+'
                    } else {
                        ' '
                    };
                    println!(
                        "  {} [{}] when {} -> {}",
                        marker, rule.index, rule.when, rule.position
                    );
                }
            }
        }
    }

    Ok(())
}

fn verify(path: &Path, mode: OutputMode) -> Result<(), Failure> {
    let layout: LayoutFile = config::load(path)?;
    let report = layout.verify();
    let path_display = path.display().to_string();

    if !report.is_valid() {
        let mut failure = Failure::new(
            exit_codes::CONFIG_ERROR,
            format!(
                "{} has {} error(s)",
                path_display,
                report.errors.len()
            ),
        );
        failure.details = report.errors;
        return Err(failure);
    }

    let data = VerifyData {
        path: path_display,
        valid: true,
        children: layout.children.len(),
        errors: report.errors,
        warnings: report.warnings,
    };

    match mode {
        OutputMode::Quiet => {}
        OutputMode::Json => output::print_json(&data),
        OutputMode::Text => {
            for warning in &data.warnings {
                println!("warning: {}", warning);
            }
            println!("ok: {} ({} children)", data.path, data.children);
        }
    }

    Ok(())
}

fn completions(shell: &str) -> Result<(), Failure> {
    let shell: Shell = shell.parse().map_err(|e: String| {
        Failure::new(exit_codes::INVALID_ARGS, format!("unsupported shell: {}", e))
    })?;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "ruleframe", &mut io::stdout());
    Ok(())
}

/// closest child names to `query`, best first
fn suggest(query: &str, names: &[&str]) -> Vec<String> {
    let query = query.to_lowercase();
    let max_distance = (query.len() / 2).max(2);

    let mut candidates: Vec<(usize, &str)> = names
        .iter()
        .map(|name| (levenshtein(&query, &name.to_lowercase()), *name))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    candidates.sort();
    candidates.dedup_by(|a, b| a.1 == b.1);

    candidates
        .into_iter()
        .take(3)
        .map(|(_, name)| name.to_string())
        .collect()
}
