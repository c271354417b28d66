use crate::error::{AppError, ServiceError};
use crate::generator::{TextGenerator, plan_prompt, title_prompt};
use crate::model::{Note, Priority, Task};
use crate::storage::json_store;
use std::cmp::Reverse;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

/// Input for [`add_task`]. Only the description is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.notes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    pub tasks_removed: usize,
    pub notes_removed: usize,
}

#[derive(Debug)]
pub enum DailyPlan {
    NothingOpen,
    Generated(String),
    /// The generator failed; open tasks ordered by priority, due date, id.
    Fallback {
        tasks: Vec<Task>,
        reason: ServiceError,
    },
}

pub fn add_task(path: &Path, new_task: NewTask) -> Result<Task, AppError> {
    insert_task(path, new_task, |_| None)
}

/// Like [`add_task`], but asks `generator` for a title when none was given.
/// The generator is consulted only after the input has validated, the store
/// has loaded and an id is available.
pub fn add_task_with_suggested_title(
    path: &Path,
    new_task: NewTask,
    generator: &dyn TextGenerator,
) -> Result<Task, AppError> {
    insert_task(path, new_task, |description| {
        suggest_title(generator, description)
    })
}

fn insert_task<F>(path: &Path, new_task: NewTask, suggest: F) -> Result<Task, AppError>
where
    F: FnOnce(&str) -> Option<String>,
{
    let description = new_task.description.trim();
    if description.is_empty() {
        return Err(AppError::validation("description is required"));
    }
    let due_date = new_task
        .due_date
        .as_deref()
        .map(normalize_due_date)
        .transpose()?
        .flatten();

    let mut tasks = json_store::load_tasks(path)?;
    let id = json_store::next_id(&tasks)?;
    let created_at = now_rfc3339()?;
    let title = non_blank(new_task.title.as_deref()).or_else(|| suggest(description));

    let task = Task {
        id,
        description: description.to_string(),
        completed: false,
        title,
        tags: clean_tags(&new_task.tags),
        priority: new_task.priority,
        due_date,
        created_at: Some(created_at),
        completed_at: None,
    };

    tasks.push(task.clone());
    json_store::save_tasks(path, &tasks)?;

    info!(id = task.id, path = %path.display(), "added task");
    Ok(task)
}

pub fn list_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    let mut tasks = json_store::load_tasks(path)?;
    tasks.sort_by_key(|task| task.id);
    Ok(tasks)
}

pub fn open_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    let mut tasks = list_tasks(path)?;
    tasks.retain(|task| !task.completed);
    Ok(tasks)
}

pub fn get_task(path: &Path, id: u64) -> Result<Task, AppError> {
    json_store::load_tasks(path)?
        .into_iter()
        .find(|task| task.id == id)
        .ok_or_else(|| AppError::not_found("task", id))
}

/// Marks a task completed. Completing a task that is already done returns
/// it unchanged and leaves the file untouched.
pub fn complete_task(path: &Path, id: u64) -> Result<Task, AppError> {
    let mut tasks = json_store::load_tasks(path)?;
    let task = tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or_else(|| AppError::not_found("task", id))?;

    if task.completed {
        debug!(id, "task already completed");
        return Ok(task.clone());
    }

    task.completed = true;
    task.completed_at = Some(now_rfc3339()?);
    let updated = task.clone();
    json_store::save_tasks(path, &tasks)?;

    info!(id, path = %path.display(), "completed task");
    Ok(updated)
}

pub fn add_note(path: &Path, new_note: NewNote) -> Result<Note, AppError> {
    let content = new_note.content.trim();
    if content.is_empty() {
        return Err(AppError::validation("content is required"));
    }

    let mut notes = json_store::load_notes(path)?;
    let note = Note {
        id: json_store::next_id(&notes)?,
        title: new_note.title.trim().to_string(),
        content: content.to_string(),
        tags: clean_tags(&new_note.tags),
        created_at: Some(now_rfc3339()?),
    };

    notes.push(note.clone());
    json_store::save_notes(path, &notes)?;

    info!(id = note.id, path = %path.display(), "added note");
    Ok(note)
}

pub fn list_notes(path: &Path) -> Result<Vec<Note>, AppError> {
    let mut notes = json_store::load_notes(path)?;
    notes.sort_by_key(|note| note.id);
    Ok(notes)
}

pub fn get_note(path: &Path, id: u64) -> Result<Note, AppError> {
    json_store::load_notes(path)?
        .into_iter()
        .find(|note| note.id == id)
        .ok_or_else(|| AppError::not_found("note", id))
}

/// Case-insensitive substring search over task titles and descriptions and
/// note titles and contents.
pub fn search(
    tasks_path: &Path,
    notes_path: &Path,
    query: &str,
) -> Result<SearchResults, AppError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AppError::validation("query is required"));
    }

    let matches = |text: &str| text.to_lowercase().contains(&needle);

    let tasks = list_tasks(tasks_path)?
        .into_iter()
        .filter(|task| matches(&task.description) || task.title.as_deref().is_some_and(matches))
        .collect();
    let notes = list_notes(notes_path)?
        .into_iter()
        .filter(|note| matches(&note.title) || matches(&note.content))
        .collect();

    Ok(SearchResults { tasks, notes })
}

/// Clears both stores. Callers are expected to have confirmed with the user.
pub fn reset(tasks_path: &Path, notes_path: &Path) -> Result<ResetSummary, AppError> {
    let tasks_removed = json_store::load_tasks(tasks_path)?.len();
    let notes_removed = json_store::load_notes(notes_path)?.len();

    json_store::save_tasks(tasks_path, &[])?;
    json_store::save_notes(notes_path, &[])?;

    info!(tasks_removed, notes_removed, "reset stores");
    Ok(ResetSummary {
        tasks_removed,
        notes_removed,
    })
}

/// Asks the generator for a short title. Failures are logged and yield
/// `None` so the caller can fall back to a manual title.
pub fn suggest_title(generator: &dyn TextGenerator, description: &str) -> Option<String> {
    let description = description.trim();
    if description.is_empty() {
        return None;
    }

    match generator.generate(&title_prompt(description)) {
        Ok(text) => {
            let title = text
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())?
                .trim_matches(|ch: char| ch == '"' || ch == '\'')
                .trim();
            non_blank(Some(title))
        }
        Err(err) => {
            warn!(error = %err, "title suggestion unavailable");
            None
        }
    }
}

pub fn daily_plan(path: &Path, generator: &dyn TextGenerator) -> Result<DailyPlan, AppError> {
    let open = open_tasks(path)?;
    if open.is_empty() {
        return Ok(DailyPlan::NothingOpen);
    }

    match generator.generate(&plan_prompt(&open)) {
        Ok(text) => Ok(DailyPlan::Generated(text)),
        Err(err) => {
            warn!(error = %err, "plan generation failed, using local ordering");
            Ok(DailyPlan::Fallback {
                tasks: fallback_order(open),
                reason: err,
            })
        }
    }
}

fn fallback_order(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        Reverse(a.priority)
            .cmp(&Reverse(b.priority))
            .then_with(|| a.due_date.is_none().cmp(&b.due_date.is_none()))
            .then_with(|| a.due_date.cmp(&b.due_date))
            .then_with(|| a.id.cmp(&b.id))
    });
    tasks
}

fn normalize_due_date(raw: &str) -> Result<Option<String>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(trimmed, &format)
        .map_err(|_| AppError::validation("due date must be YYYY-MM-DD"))?;
    let normalized = date
        .format(&format)
        .map_err(|err| AppError::validation(err.to_string()))?;
    Ok(Some(normalized))
}

fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::Clock(err.to_string()))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .filter_map(|tag| non_blank(Some(tag.as_str())))
        .collect()
}
