use clap::{Parser, Subcommand};
use std::path::PathBuf;
use task_core::config::{Config, ConfigOverrides, merge_overrides};
use task_core::error::AppError;

#[derive(Parser, Debug)]
#[command(name = "task", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the tasks JSON file [default: tasks.json]
    #[arg(long, value_name = "PATH", env = "TASKS_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Path to the notes JSON file [default: notes.json next to the tasks file]
    #[arg(long, value_name = "PATH", env = "NOTES_FILE", global = true)]
    pub notes_file: Option<PathBuf>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: task add "Buy milk" --priority high --due 2026-10-20
    Add {
        description: Option<String>,
        /// Short title; suggested by the text generator when omitted
        #[arg(long)]
        title: Option<String>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
    },
    /// List tasks ordered by id
    ///
    /// Example: task list --json
    List,
    /// Mark a task as completed
    ///
    /// Example: task done 1
    #[command(alias = "complete")]
    Done { id: String },
    /// Show details of a task
    ///
    /// Example: task show 1
    Show { id: String },
    /// Search tasks and notes
    ///
    /// Example: task search essay
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Suggest an ordered plan for today from open tasks
    ///
    /// Example: task plan
    Plan,
    /// Delete ALL tasks and notes
    ///
    /// Example: task reset --yes
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Manage notes
    ///
    /// Example: task note add "Lecture" "AI and PKMS discussion"
    Note {
        #[command(subcommand)]
        note: NoteCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    /// Add a note
    ///
    /// Example: task note add "Lecture" "AI and PKMS discussion" --tag ai
    Add {
        title: String,
        content: Option<String>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
    /// List notes
    ///
    /// Example: task note list
    List,
    /// Show a note
    ///
    /// Example: task note show 1
    Show { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    TasksFile,
    NotesFile,
    CredentialEnv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    if value.is_empty() {
        return Err("override value cannot be empty".to_string());
    }

    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "tasks_file" | "file" => ConfigOverrideTarget::TasksFile,
        "notes_file" => ConfigOverrideTarget::NotesFile,
        "credential_env" | "generator_credential_env" => ConfigOverrideTarget::CredentialEnv,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Applies every `--config-override` on top of the loaded config.
pub fn apply_config_overrides(base: &Config, raw: &[String]) -> Result<Config, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::validation)?;
        match parsed.target {
            ConfigOverrideTarget::TasksFile => overrides.tasks_file = Some(parsed.value.into()),
            ConfigOverrideTarget::NotesFile => overrides.notes_file = Some(parsed.value.into()),
            ConfigOverrideTarget::CredentialEnv => overrides.credential_env = Some(parsed.value),
        }
    }
    Ok(merge_overrides(base, &overrides))
}

/// Parses a record id typed by the user.
pub fn parse_id(raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation(format!("invalid id: {}", raw.trim()))),
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
