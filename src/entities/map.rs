use serde::{Deserialize, Serialize};

use crate::entities::Placemark;

// where the map centers before any placemark exists
pub const DEFAULT_CENTER: (f64, f64) = (43.55473, -5.92483);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Map {
    pub name: String,
    placemarks: Vec<Placemark>,
}

impl Map {
    pub fn new(name: String) -> Self {
        Self {
            name,
            placemarks: Vec::new(),
        }
    }

    // insertion order is chronological; a placemark id is held at most once
    pub fn add(&mut self, placemark: Placemark) {
        if self.placemarks.iter().any(|p| p.id == placemark.id) {
            return;
        }

        self.placemarks.push(placemark);
    }

    pub fn placemarks(&self) -> &[Placemark] {
        &self.placemarks
    }

    pub fn len(&self) -> usize {
        self.placemarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placemarks.is_empty()
    }

    pub fn center(&self) -> (f64, f64) {
        match self.placemarks.last() {
            Some(p) => (p.latitude, p.longitude),
            None => DEFAULT_CENTER,
        }
    }
}
