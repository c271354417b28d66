use super::Record;
use super::fields::{
    FieldError, as_object, optional_string, required_id, required_text, string_list,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record for Note {
    const KIND: &'static str = "note";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_value(value: &Value) -> Result<Self, FieldError> {
        let object = as_object(value)?;
        Ok(Self {
            id: required_id(object)?,
            title: optional_string(object, "title")?.unwrap_or_default(),
            content: required_text(object, "content")?,
            tags: string_list(object, "tags")?,
            created_at: optional_string(object, "created_at")?,
        })
    }
}
