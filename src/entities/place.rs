use serde::{Deserialize, Serialize};

use crate::entities::{Comment, Photo, Rating};

// identified by its container locator, not a local key
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub photos: Vec<Photo>,
    pub ratings: Vec<Rating>,
    pub comments: Vec<Comment>,
}

impl Place {
    pub fn new(title: String, latitude: f64, longitude: f64, description: String) -> Self {
        Self {
            title,
            latitude,
            longitude,
            description,
            photos: Vec::new(),
            ratings: Vec::new(),
            comments: Vec::new(),
        }
    }
}
