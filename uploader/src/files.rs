use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque id the backend assigns to a file record. Whatever JSON the backend sent is
/// handed back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Value);

impl FileId {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for FileId {
    fn from(value: Value) -> Self {
        FileId(value)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Response to the `create` action.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub date: String,
    pub uuid: String,
}

#[derive(Debug, Serialize)]
pub struct CreateFile<'a> {
    pub dir: &'a str,
}

/// Body of the `update` action that finalizes a record.
#[derive(Debug, Serialize)]
pub struct UpdateFile<'a> {
    pub date: &'a str,
    pub uuid: &'a str,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub content_type: &'a str,
    pub ext: &'a str,
    pub size: u64,
}

/// `{dir}/{date}/{uuid}.{ext}`, dropping the leading segment when `dir` is empty.
pub fn destination_path(dir: &str, date: &str, uuid: &str, ext: &str) -> String {
    if dir.is_empty() {
        format!("{date}/{uuid}.{ext}")
    } else {
        format!("{dir}/{date}/{uuid}.{ext}")
    }
}
