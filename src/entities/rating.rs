use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub author: String,
    pub score: f64,
}

impl Rating {
    pub const MAX_SCORE: f64 = 5.0;

    pub fn new(author: String, score: f64) -> Self {
        Self { author, score }
    }
}
