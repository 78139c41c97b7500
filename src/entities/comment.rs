use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: String, text: String) -> Self {
        Self {
            author,
            text,
            created_at: Utc::now(),
        }
    }
}
