use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

/// A book request submitted through the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Unique identifier, assigned on creation. Numeric ids from older
    /// documents are read as their decimal text.
    #[serde(deserialize_with = "scalar_text")]
    pub id: String,
    /// Who asked for the book
    #[serde(default, deserialize_with = "optional_text")]
    pub name: String,
    /// Requested title
    #[serde(default, deserialize_with = "optional_text")]
    pub title: String,
    /// Requested author
    #[serde(default, deserialize_with = "optional_text")]
    pub author: String,
    /// Free-form notes
    #[serde(default, deserialize_with = "optional_text")]
    pub notes: String,
    /// Whether the book has been made available
    #[serde(default, deserialize_with = "optional_flag")]
    pub checked: bool,
}

/// Fields supplied by a requester when creating a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub notes: String,
}

impl NewRequest {
    fn into_record(self) -> RequestRecord {
        RequestRecord {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            title: self.title,
            author: self.author,
            notes: self.notes,
            checked: false,
        }
    }
}

/// On-disk layout: `{ "requests": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestDocument {
    pub requests: Vec<RequestRecord>,
}

impl RequestDocument {
    /// Read a parsed document, keeping every entry that forms a record.
    ///
    /// A missing, null or non-array `requests` key is an empty list. Entries
    /// that are not records are skipped with a warning.
    pub fn from_value(value: Value) -> Self {
        let entries = match value {
            Value::Object(mut fields) => match fields.remove("requests") {
                Some(Value::Array(entries)) => entries,
                None | Some(Value::Null) => Vec::new(),
                Some(other) => {
                    tracing::warn!(found = %other, "`requests` is not a list, reading it as empty");
                    Vec::new()
                }
            },
            other => {
                tracing::warn!(found = %other, "request document is not an object, reading it as empty");
                Vec::new()
            }
        };

        let requests = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match RequestRecord::deserialize(&entry) {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::warn!(index, %error, "skipping unreadable request entry");
                    None
                }
            })
            .collect();

        Self { requests }
    }

    pub fn push(&mut self, request: NewRequest) -> RequestRecord {
        let record = request.into_record();
        self.requests.push(record.clone());
        record
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        match self.requests.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.checked = !record.checked;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.requests.len();
        self.requests.retain(|record| record.id != id);
        before - self.requests.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(Number),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
        }
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn optional_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

fn optional_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}
