use super::Record;
use super::fields::{
    FieldError, as_object, optional_bool, optional_string, required_id, required_text,
    string_list,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Task {
    /// A fresh, open task with only the required fields set.
    pub fn new(id: u64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            completed: false,
            title: None,
            tags: Vec::new(),
            priority: None,
            due_date: None,
            created_at: None,
            completed_at: None,
        }
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Done
        } else {
            TaskStatus::Open
        }
    }

    /// Title when one was given, otherwise the description.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.description,
        }
    }
}

impl Record for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_value(value: &Value) -> Result<Self, FieldError> {
        let object = as_object(value)?;
        let id = required_id(object)?;
        let description = required_text(object, "description")?;

        // Older files carry `done` or a `status` string instead of `completed`.
        let completed = match optional_bool(object, "completed")? {
            Some(flag) => flag,
            None => match optional_bool(object, "done")? {
                Some(flag) => flag,
                None => match optional_string(object, "status")? {
                    Some(status) => status
                        .parse::<TaskStatus>()
                        .map_err(|reason| FieldError::new("status", reason))?
                        == TaskStatus::Done,
                    None => false,
                },
            },
        };

        let priority = optional_string(object, "priority")?
            .map(|raw| raw.parse::<Priority>())
            .transpose()
            .map_err(|reason| FieldError::new("priority", reason))?;

        Ok(Self {
            id,
            description,
            completed,
            title: optional_string(object, "title")?,
            tags: string_list(object, "tags")?,
            priority,
            due_date: optional_string(object, "due_date")?,
            created_at: optional_string(object, "created_at")?,
            completed_at: optional_string(object, "completed_at")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" | "pending" => Ok(Self::Open),
            "done" | "completed" | "closed" => Ok(Self::Done),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unknown priority '{other}' (expected low, medium or high)"
            )),
        }
    }
}
