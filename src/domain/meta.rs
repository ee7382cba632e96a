use serde::{Deserialize, Serialize};

/// A generated (title, description) pair. Either component may be empty
/// when generation failed or the reply could not be parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedMeta {
    pub title: String,
    pub description: String,
}

impl GeneratedMeta {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }
}
