//! Line-oriented command shell over a [`SyncEngine`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracker_core::{DateRange, FilterPredicate, JobDraft, JobId, JobPatch, JobStatus};
use tracker_engine::{ErrorKind, MutationOutcome, SyncEngine};
use tracker_logging::tracker_debug;

use crate::dates::{parse_day_end, parse_day_start};
use crate::render;

const PROMPT: &str = "tracker> ";

#[derive(Debug, Parser)]
#[command(
    name = "tracker",
    no_binary_name = true,
    disable_version_flag = true
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Show the filtered list of applications.
    #[command(alias = "ls")]
    List,
    /// Show totals and per-status shares.
    Stats,
    /// Add a new application.
    Add {
        #[arg(long)]
        company: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        status: Option<JobStatus>,
        /// Application date (YYYY-MM-DD or RFC 3339); defaults to now.
        #[arg(long, value_parser = parse_day_start)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change fields of an application. An empty --link or --notes clears it.
    Edit {
        id: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        status: Option<JobStatus>,
        #[arg(long, value_parser = parse_day_start)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Set the status of an application.
    Status { id: String, status: JobStatus },
    /// Delete an application.
    #[command(alias = "rm")]
    Delete { id: String },
    /// Narrow the list by status and application date.
    Filter {
        /// Repeat or separate with commas to allow several statuses.
        #[arg(long = "status", value_delimiter = ',')]
        statuses: Vec<JobStatus>,
        #[arg(long, value_parser = parse_day_start)]
        from: Option<DateTime<Utc>>,
        /// Inclusive; a bare day covers the whole day.
        #[arg(long, value_parser = parse_day_end)]
        to: Option<DateTime<Utc>>,
    },
    /// Clear the filter.
    Reset,
    /// Reconnect to the API after falling back to mock data.
    Retry,
    /// Hide the current notification.
    Dismiss,
    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("unterminated quote")]
    UnterminatedQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl ShellCommand {
    fn into_edit(self) -> Option<(JobId, JobPatch)> {
        match self {
            ShellCommand::Edit {
                id,
                company,
                role,
                status,
                date,
                link,
                notes,
            } => Some((
                JobId::new(id),
                JobPatch {
                    company,
                    role,
                    status,
                    date_applied: date,
                    link,
                    notes,
                },
            )),
            ShellCommand::Status { id, status } => Some((JobId::new(id), JobPatch::status(status))),
            _ => None,
        }
    }
}

/// Splits a line into words. Single or double quotes group words; a
/// backslash escapes the next character.
pub fn split_words(line: &str) -> Result<Vec<String>, ShellError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ShellError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parses one input line. `Ok(None)` for a blank line; `Err` carries the text
/// to show the user, including clap's help output.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let words = split_words(line).map_err(|err| err.to_string())?;
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|err| err.to_string())
}

/// Runs one command and returns the lines to print.
pub async fn execute(engine: &SyncEngine, command: ShellCommand) -> (Flow, Vec<String>) {
    tracker_debug!("Executing {:?}", command);
    let lines = match command {
        ShellCommand::List => render::render(&engine.view()),
        ShellCommand::Stats => render::render_stats(&engine.view().stats),
        ShellCommand::Add {
            company,
            role,
            status,
            date,
            link,
            notes,
        } => {
            let mut draft = JobDraft::new(company, role, date.unwrap_or_else(Utc::now));
            draft.status = status.unwrap_or_default();
            draft.link = link;
            draft.notes = notes;
            let outcome = engine.create(draft).await;
            after_mutation(engine, &outcome)
        }
        edit @ (ShellCommand::Edit { .. } | ShellCommand::Status { .. }) => {
            match edit.into_edit() {
                Some((id, patch)) if patch.is_empty() => {
                    vec![format!("Nothing to change for {id}")]
                }
                Some((id, patch)) => {
                    let outcome = engine.update(&id, patch).await;
                    after_mutation(engine, &outcome)
                }
                None => Vec::new(),
            }
        }
        ShellCommand::Delete { id } => {
            let outcome = engine.delete(&JobId::new(id)).await;
            after_mutation(engine, &outcome)
        }
        ShellCommand::Filter { statuses, from, to } => {
            engine.apply_filter(FilterPredicate::new(statuses, DateRange::new(from, to)));
            render::render_list(&engine.view())
        }
        ShellCommand::Reset => {
            engine.reset_filter();
            render::render_list(&engine.view())
        }
        ShellCommand::Retry => {
            engine.retry_connection().await;
            render::render(&engine.view())
        }
        ShellCommand::Dismiss => {
            engine.dismiss_notification();
            Vec::new()
        }
        ShellCommand::Quit => return (Flow::Quit, Vec::new()),
    };
    (Flow::Continue, lines)
}

/// Validation failures are reported inline; everything else already raised a
/// notification.
fn after_mutation(engine: &SyncEngine, outcome: &MutationOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    match &outcome.reason {
        Some(ErrorKind::Validation(errors)) => {
            lines.extend(errors.iter().map(|e| format!("  {}: {}", e.field, e.message)));
            return lines;
        }
        Some(ErrorKind::NotFound(id)) => lines.push(format!("No application with id {id}")),
        _ => {}
    }
    lines.extend(render::render_status(&engine.view()));
    lines
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(engine: &SyncEngine) -> anyhow::Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    print_lines(&render::render(&engine.view()));
    engine.consume_dirty();

    loop {
        print_prompt();
        let Some(line) = input.next_line().await? else {
            break;
        };
        engine.tick(Instant::now());

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message.trim_end());
                continue;
            }
        };

        let (flow, lines) = execute(engine, command).await;
        print_lines(&lines);
        engine.consume_dirty();
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn print_prompt() {
    use std::io::Write;

    print!("{PROMPT}");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn quotes_group_words() {
        assert_eq!(
            split_words(r#"add --company "Acme Corp" --role 'Site Reliability' --notes it\'s"#)
                .unwrap(),
            vec![
                "add",
                "--company",
                "Acme Corp",
                "--role",
                "Site Reliability",
                "--notes",
                "it's"
            ]
        );
        assert_eq!(split_words(r#"edit 1 --link """#).unwrap(), vec!["edit", "1", "--link", ""]);
        assert_eq!(split_words("   ").unwrap(), Vec::<String>::new());
        assert_eq!(split_words("add \"oops"), Err(ShellError::UnterminatedQuote));
    }

    #[test]
    fn status_command_parses_case_insensitively() {
        assert_eq!(
            parse_line("status mock1 offer").unwrap(),
            Some(ShellCommand::Status {
                id: "mock1".to_string(),
                status: JobStatus::Offer,
            })
        );
    }

    #[test]
    fn filter_accepts_status_list_and_day_bounds() {
        let command = parse_line("filter --status applied,interview --from 2024-01-01 --to 2024-01-31")
            .unwrap()
            .unwrap();
        let ShellCommand::Filter { statuses, from, to } = command else {
            panic!("expected filter");
        };
        assert_eq!(statuses, vec![JobStatus::Applied, JobStatus::Interview]);
        assert_eq!(from, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert!(to.unwrap() > Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap());
    }

    #[test]
    fn bad_input_reports_instead_of_failing() {
        assert!(parse_line("status mock1 ghosted").is_err());
        assert!(parse_line("filter --from yesterday").is_err());
        assert!(parse_line("frobnicate").is_err());
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn edit_without_fields_is_empty_patch() {
        let command = parse_line("edit 7").unwrap().unwrap();
        let (id, patch) = command.into_edit().unwrap();
        assert_eq!(id, JobId::new("7"));
        assert!(patch.is_empty());
    }
}
