use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub category: String,
    pub place_url: Option<String>,
}

impl Placemark {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            latitude,
            longitude,
            title: String::new(),
            category: String::new(),
            place_url: None,
        }
    }
}
