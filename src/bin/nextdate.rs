//! Command-line front end for the repeat-rule engine.
//!
//! `nextdate next --date 20240101 --repeat "d 3" --now 20240110` prints `20240113`.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use repeat_rule::{CalendarDate, Completion, DateError, EngineError};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "nextdate=info";
const EXIT_FAULT: u8 = 1;
const EXIT_BAD_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "nextdate", version, about = "Next occurrence of a task repeat rule")]
struct Cli {
    /// Reference date as YYYYMMDD (defaults to today)
    #[arg(long, global = true, env = "NEXTDATE_NOW")]
    now: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the first occurrence after `now`
    Next {
        /// Date the rule counts from, YYYYMMDD
        #[arg(long)]
        date:   String,
        /// Repeat rule, e.g. "d 7", "y", "w 1,3", "m -1 2,8"
        #[arg(long)]
        repeat: String,
    },
    /// Print the date to store for a new task
    Plan {
        #[arg(long, default_value = "")]
        date:   String,
        #[arg(long, default_value = "")]
        repeat: String,
    },
    /// Print the rescheduled date of a completed task, or `remove`
    Done {
        #[arg(long)]
        date:   String,
        #[arg(long, default_value = "")]
        repeat: String,
    },
}

impl Cli {
    fn today(&self) -> Result<CalendarDate> {
        match &self.now {
            Some(text) => text
                .parse()
                .with_context(|| format!("invalid --now {text:?}")),
            None => CalendarDate::from_naive(chrono::Local::now().date_naive())
                .context("local date is out of range"),
        }
    }

    fn run(&self) -> Result<String> {
        let today = self.today()?;

        match &self.command {
            Command::Next { date, repeat } => {
                info!(%today, date = %date, repeat = %repeat, "next occurrence");
                let next = repeat_rule::next_occurrence(date, &today.to_string(), repeat)?;
                debug!(%next, "computed");
                Ok(next)
            },
            Command::Plan { date, repeat } => {
                info!(%today, date = %date, repeat = %repeat, "planning task date");
                Ok(repeat_rule::initial_date(today, date, repeat)?.to_string())
            },
            Command::Done { date, repeat } => {
                info!(%today, date = %date, repeat = %repeat, "completing task");
                Ok(match repeat_rule::complete(today, date, repeat)? {
                    Completion::Remove => "remove".to_owned(),
                    Completion::Reschedule(next) => next.to_string(),
                })
            },
        }
    }
}

/// Bad dates and rules are the caller's fault; anything else is ours.
fn is_bad_input(err: &anyhow::Error) -> bool {
    err.downcast_ref::<EngineError>()
        .is_some_and(EngineError::is_client_error)
        || err.downcast_ref::<DateError>().is_some()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.run() {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        },
        Err(err) => {
            let bad_input = is_bad_input(&err);
            error!(error = %format!("{err:#}"), bad_input, "request failed");
            eprintln!("{err:#}");
            ExitCode::from(if bad_input { EXIT_BAD_INPUT } else { EXIT_FAULT })
        },
    }
}
