use tabled::settings::Style;
use tabled::{Table, Tabled};
use task_core::error::ServiceError;
use task_core::model::{Note, Task};
use task_core::task_api::{DailyPlan, SearchResults};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

fn done_mark(task: &Task) -> &'static str {
    if task.completed { "x" } else { " " }
}

fn priority_label(task: &Task) -> &'static str {
    task.priority.map(|priority| priority.as_str()).unwrap_or("-")
}

fn note_title(note: &Note) -> &str {
    if note.title.is_empty() {
        "(no title)"
    } else {
        &note.title
    }
}

pub fn print_tasks_plain(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let rows = tasks.iter().map(|task| TaskRow {
        id: task.id,
        done: done_mark(task),
        title: task.display_title().to_string(),
        priority: priority_label(task),
        due: task.due_date.clone().unwrap_or_else(|| "-".to_string()),
        tags: task.tags.join(", "),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
}

pub fn print_tasks_json(tasks: &[Task]) {
    println!("{}", serde_json::json!(tasks));
}

pub fn print_task_json(task: &Task) {
    println!("{}", serde_json::json!(task));
}

pub fn print_task_details(task: &Task) {
    println!("Task {}: {}", task.id, task.display_title());
    println!("Description: {}", task.description);
    println!("Status: {}", task.status().as_str());
    println!("Priority: {}", priority_label(task));
    println!("Due: {}", task.due_date.as_deref().unwrap_or("-"));
    println!("Tags: {}", task.tags.join(", "));
    println!("Created: {}", task.created_at.as_deref().unwrap_or("-"));
    if let Some(completed_at) = task.completed_at.as_deref() {
        println!("Completed: {completed_at}");
    }
}

pub fn print_notes_plain(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    let rows = notes.iter().map(|note| NoteRow {
        id: note.id,
        title: note_title(note).to_string(),
        tags: note.tags.join(", "),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
}

pub fn print_notes_json(notes: &[Note]) {
    println!("{}", serde_json::json!(notes));
}

pub fn print_note_json(note: &Note) {
    println!("{}", serde_json::json!(note));
}

pub fn print_note_details(note: &Note) {
    println!("Note {}: {}", note.id, note_title(note));
    println!("Tags: {}", note.tags.join(", "));
    println!("Content:");
    println!("{}", note.content);
}

pub fn print_search_plain(results: &SearchResults) {
    if results.is_empty() {
        println!("No matches found.");
        return;
    }

    for task in &results.tasks {
        println!(
            "Task [{}] {}  (priority: {}, status: {})",
            task.id,
            task.display_title(),
            priority_label(task),
            task.status().as_str()
        );
    }
    for note in &results.notes {
        println!("Note [{}] {}", note.id, note_title(note));
    }
}

pub fn print_search_json(results: &SearchResults) {
    println!(
        "{}",
        serde_json::json!({
            "tasks": results.tasks,
            "notes": results.notes,
        })
    );
}

pub fn print_plan_plain(plan: &DailyPlan) {
    match plan {
        DailyPlan::NothingOpen => println!("No open tasks to plan."),
        DailyPlan::Generated(text) => {
            println!("Plan for today:");
            println!("{text}");
        }
        DailyPlan::Fallback { tasks, reason } => {
            eprintln!("WARNING: {}", fallback_notice(reason));
            println!("Plan for today (by priority and due date):");
            for (position, task) in tasks.iter().enumerate() {
                println!(
                    "{}. [{}] {}  (priority: {}, due: {})",
                    position + 1,
                    task.id,
                    task.display_title(),
                    priority_label(task),
                    task.due_date.as_deref().unwrap_or("-")
                );
            }
        }
    }
}

pub fn print_plan_json(plan: &DailyPlan) {
    let payload = match plan {
        DailyPlan::NothingOpen => serde_json::json!({ "source": "none", "plan": null }),
        DailyPlan::Generated(text) => serde_json::json!({ "source": "generator", "plan": text }),
        DailyPlan::Fallback { tasks, reason } => serde_json::json!({
            "source": "fallback",
            "reason": reason.to_string(),
            "plan": tasks,
        }),
    };
    println!("{payload}");
}

fn fallback_notice(reason: &ServiceError) -> String {
    match reason {
        ServiceError::NotConfigured => {
            "no text generator configured; ordering open tasks locally".to_string()
        }
        other => format!("{other}; ordering open tasks locally"),
    }
}
