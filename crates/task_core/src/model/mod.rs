mod fields;
mod note;
mod task;

pub use fields::FieldError;
pub use note::Note;
pub use task::{Priority, Task, TaskStatus};

use serde::Serialize;
use serde_json::Value;

/// A record persisted as one element of a JSON array file.
pub trait Record: Serialize + Clone + Sized {
    /// Human-readable record kind used in error messages ("task", "note").
    const KIND: &'static str;

    fn id(&self) -> u64;

    /// Parses one untyped JSON element, naming the field that failed.
    fn from_value(value: &Value) -> Result<Self, FieldError>;
}
