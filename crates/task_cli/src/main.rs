mod cli;
mod render;

use clap::{CommandFactory, Parser};
use cli::{Cli, Command, NoteCommand, apply_config_overrides, parse_id};
use std::io::{self, Write};
use std::path::Path;
use task_core::config::{Config, StorePaths, load_config_with_fallback, resolve_store_paths};
use task_core::error::AppError;
use task_core::generator::{TextGenerator, generator_from_config};
use task_core::model::Priority;
use task_core::task_api::{self, NewNote, NewTask};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    // Opt-in via RUST_LOG; stdout stays reserved for command output.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::validation(message)
}

fn report(err: &AppError) {
    eprintln!("ERROR: {} - {}", err.code(), err);
}

/// Splits an interactive line into argv words. Double or single quotes group
/// words; a backslash escapes the active quote character inside quotes.
fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut words = Vec::new();
    let mut word: Option<String> = None;
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), '\\') if chars.peek() == Some(&open) || chars.peek() == Some(&'\\') => {
                if let Some(escaped) = chars.next() {
                    word.get_or_insert_with(String::new).push(escaped);
                }
            }
            (Some(open), ch) if ch == open => quote = None,
            (None, '"' | '\'') => {
                quote = Some(ch);
                word.get_or_insert_with(String::new);
            }
            (None, ch) if ch.is_whitespace() => words.extend(word.take()),
            (_, ch) => word.get_or_insert_with(String::new).push(ch),
        }
    }

    if let Some(open) = quote {
        return Err(AppError::validation(format!(
            "unterminated {open} quote in command"
        )));
    }
    words.extend(word);
    Ok(words)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn parse_priority(raw: Option<&str>) -> Result<Option<Priority>, AppError> {
    raw.map(|value| value.parse::<Priority>().map_err(AppError::validation))
        .transpose()
}

fn confirm(prompt: &str) -> Result<bool, AppError> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|err| AppError::storage(Path::new("<stdout>"), err))?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .map_err(|err| AppError::storage(Path::new("<stdin>"), err))?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn run_command(cli: Cli, base: &Config) -> Result<(), AppError> {
    let config = apply_config_overrides(base, &cli.config_override)?;
    let generator = generator_from_config(&config);
    run_with_config(cli, &config, generator.as_ref())
}

fn run_with_config(
    cli: Cli,
    config: &Config,
    generator: &dyn TextGenerator,
) -> Result<(), AppError> {
    let StorePaths { tasks, notes } =
        resolve_store_paths(config, cli.file.as_deref(), cli.notes_file.as_deref());
    debug!(tasks = %tasks.display(), notes = %notes.display(), "resolved store paths");

    match cli.command {
        Command::Add {
            description,
            title,
            tags,
            priority,
            due,
        } => {
            let description = match description {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::validation("description is required")),
            };
            let new_task = NewTask {
                description,
                title,
                tags,
                priority: parse_priority(priority.as_deref())?,
                due_date: due,
            };
            let task = task_api::add_task_with_suggested_title(&tasks, new_task, generator)?;
            if cli.json {
                render::print_task_json(&task);
            } else {
                println!("Added task {}: \"{}\"", task.id, task.description);
            }
        }
        Command::List => {
            let listed = task_api::list_tasks(&tasks)?;
            if cli.json {
                render::print_tasks_json(&listed);
            } else {
                render::print_tasks_plain(&listed);
            }
        }
        Command::Done { id } => {
            let task = task_api::complete_task(&tasks, parse_id(&id)?)?;
            if cli.json {
                render::print_task_json(&task);
            } else {
                println!("Task {} marked completed.", task.id);
            }
        }
        Command::Show { id } => {
            let task = task_api::get_task(&tasks, parse_id(&id)?)?;
            if cli.json {
                render::print_task_json(&task);
            } else {
                render::print_task_details(&task);
            }
        }
        Command::Search { query } => {
            let results = task_api::search(&tasks, &notes, &query.join(" "))?;
            if cli.json {
                render::print_search_json(&results);
            } else {
                render::print_search_plain(&results);
            }
        }
        Command::Plan => {
            let plan = task_api::daily_plan(&tasks, generator)?;
            if cli.json {
                render::print_plan_json(&plan);
            } else {
                render::print_plan_plain(&plan);
            }
        }
        Command::Reset { yes } => {
            if !yes && !confirm("Are you sure you want to delete ALL tasks and notes? (y/n): ")? {
                println!("Reset canceled.");
                return Ok(());
            }
            let summary = task_api::reset(&tasks, &notes)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "tasks_removed": summary.tasks_removed,
                        "notes_removed": summary.notes_removed,
                    })
                );
            } else {
                println!(
                    "Removed {} tasks and {} notes.",
                    summary.tasks_removed, summary.notes_removed
                );
            }
        }
        Command::Note { note } => run_note_command(note, &notes, cli.json)?,
    }

    Ok(())
}

fn run_note_command(
    command: NoteCommand,
    notes: &Path,
    json: bool,
) -> Result<(), AppError> {
    match command {
        NoteCommand::Add {
            title,
            content,
            tags,
        } => {
            let note = task_api::add_note(
                notes,
                NewNote {
                    title,
                    content: content.unwrap_or_default(),
                    tags,
                },
            )?;
            if json {
                render::print_note_json(&note);
            } else {
                println!("Added note {}: {}", note.id, note.title);
            }
        }
        NoteCommand::List => {
            let listed = task_api::list_notes(notes)?;
            if json {
                render::print_notes_json(&listed);
            } else {
                render::print_notes_plain(&listed);
            }
        }
        NoteCommand::Show { id } => {
            let note = task_api::get_note(notes, parse_id(&id)?)?;
            if json {
                render::print_note_json(&note);
            } else {
                render::print_note_details(&note);
            }
        }
    }

    Ok(())
}

fn run_interactive(config: &Config) -> Result<(), AppError> {
    let mut input = String::new();

    loop {
        input.clear();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|err| AppError::storage(Path::new("<stdin>"), err))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                report(&err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("task".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                report(&normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, config) {
            report(&err);
        }
    }

    Ok(())
}

fn main() {
    init_tracing();

    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        eprintln!("WARNING: ignoring config: {err}");
    }
    let config = loaded.config;

    let mut args = std::env::args_os();
    args.next();
    let result = if args.next().is_none() {
        run_interactive(&config)
    } else {
        match Cli::try_parse() {
            Ok(cli) => run_command(cli, &config),
            Err(err) if !err.use_stderr() => {
                // --help and --version
                let _ = err.print();
                return;
            }
            Err(err) => Err(normalize_parse_error(err)),
        }
    };

    if let Err(err) = result {
        report(&err);
        std::process::exit(err.exit_code());
    }
}
