use serde::Deserialize;

/// Form body naming a single request.
/// A missing `id` deserializes as empty and matches nothing.
#[derive(Debug, Default, Deserialize)]
pub struct RequestIdForm {
    #[serde(default)]
    pub id: String,
}
