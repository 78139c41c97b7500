use serde::{Deserialize, Serialize};

// a reference to an already uploaded image; upload mechanics live elsewhere
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub author: String,
    pub url: String,
}

impl Photo {
    pub fn new(author: String, url: String) -> Self {
        Self { author, url }
    }
}
