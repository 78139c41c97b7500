use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::{Comment, Photo, Place, Placemark, Rating};
use crate::error::{encode_error, schema_mismatch_error, Error};

const KIND_PLACEMARK: &str = "placemark";
const KIND_PLACE: &str = "place";
const KIND_COMMENT: &str = "comment";
const KIND_RATING: &str = "rating";
const KIND_PHOTO: &str = "photo";

// one addressable entity inside a container
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub attributes: serde_json::Map<String, Value>,
}

impl Record {
    fn new(kind: &str) -> Self {
        let mut record = Self {
            id: Uuid::new_v4(),
            attributes: serde_json::Map::new(),
        };
        record.set_str("kind", kind);
        record
    }

    pub fn kind(&self) -> Option<&str> {
        self.attributes.get("kind").and_then(Value::as_str)
    }

    fn set_str(&mut self, key: &str, value: &str) {
        self.attributes.insert(key.into(), Value::String(value.into()));
    }

    fn set_f64(&mut self, key: &str, value: f64) {
        self.attributes.insert(key.into(), Value::from(value));
    }

    fn require_str(&self, key: &str) -> Result<&str, Error> {
        match self.attributes.get(key) {
            Some(Value::String(value)) => Ok(value),
            Some(_) => Err(schema_mismatch_error(&format!(
                "attribute {} is not a string",
                key
            ))),
            None => Err(schema_mismatch_error(&format!("missing attribute {}", key))),
        }
    }

    fn require_f64(&self, key: &str) -> Result<f64, Error> {
        match self.attributes.get(key) {
            Some(Value::Number(value)) => value
                .as_f64()
                .ok_or_else(|| schema_mismatch_error(&format!("attribute {} is not a number", key))),
            Some(_) => Err(schema_mismatch_error(&format!(
                "attribute {} is not a number",
                key
            ))),
            None => Err(schema_mismatch_error(&format!("missing attribute {}", key))),
        }
    }

    fn optional_str(&self, key: &str) -> Result<Option<&str>, Error> {
        match self.attributes.get(key) {
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(schema_mismatch_error(&format!(
                "attribute {} is not a string",
                key
            ))),
            None => Ok(None),
        }
    }
}

// the whole-resource unit of read and write
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    // an existing id is replaced in place, a new one is appended
    pub fn insert(&mut self, record: Record) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
            return;
        }

        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), Error> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(encode_error("latitude out of range"));
    }

    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(encode_error("longitude out of range"));
    }

    Ok(())
}

// every encode call mints a fresh record id, so re-encoding identical data
// always appends rather than replaces
pub fn encode_placemark(placemark: &Placemark) -> Result<Record, Error> {
    check_coordinates(placemark.latitude, placemark.longitude)?;

    let mut record = Record::new(KIND_PLACEMARK);
    record.set_str("name", &placemark.title);
    record.set_f64("latitude", placemark.latitude);
    record.set_f64("longitude", placemark.longitude);

    if !placemark.category.is_empty() {
        record.set_str("category", &placemark.category);
    }

    if let Some(url) = &placemark.place_url {
        record.set_str("place", url);
    }

    Ok(record)
}

pub fn decode_placemark(record: &Record) -> Result<Placemark, Error> {
    Ok(Placemark {
        id: record.id,
        title: record.require_str("name")?.to_string(),
        latitude: record.require_f64("latitude")?,
        longitude: record.require_f64("longitude")?,
        category: record.optional_str("category")?.unwrap_or("").to_string(),
        place_url: record.optional_str("place")?.map(str::to_string),
    })
}

pub fn encode_place(place: &Place) -> Result<Record, Error> {
    check_coordinates(place.latitude, place.longitude)?;

    let mut record = Record::new(KIND_PLACE);
    record.set_str("name", &place.title);
    record.set_f64("latitude", place.latitude);
    record.set_f64("longitude", place.longitude);
    record.set_str("description", &place.description);

    Ok(record)
}

pub fn decode_place(record: &Record) -> Result<Place, Error> {
    Ok(Place::new(
        record.require_str("name")?.to_string(),
        record.require_f64("latitude")?,
        record.require_f64("longitude")?,
        record.require_str("description")?.to_string(),
    ))
}

pub fn encode_comment(comment: &Comment) -> Result<Record, Error> {
    if comment.text.trim().is_empty() {
        return Err(encode_error("empty comment text"));
    }

    let mut record = Record::new(KIND_COMMENT);
    record.set_str("author", &comment.author);
    record.set_str("text", &comment.text);
    record.set_str("created_at", &comment.created_at.to_rfc3339());

    Ok(record)
}

pub fn decode_comment(record: &Record) -> Result<Comment, Error> {
    let created_at = DateTime::parse_from_rfc3339(record.require_str("created_at")?)
        .map_err(|_| schema_mismatch_error("attribute created_at is not a timestamp"))?
        .with_timezone(&Utc);

    Ok(Comment {
        author: record.require_str("author")?.to_string(),
        text: record.require_str("text")?.to_string(),
        created_at,
    })
}

pub fn encode_rating(rating: &Rating) -> Result<Record, Error> {
    if !rating.score.is_finite() || !(0.0..=Rating::MAX_SCORE).contains(&rating.score) {
        return Err(encode_error("score out of bounds"));
    }

    let mut record = Record::new(KIND_RATING);
    record.set_str("author", &rating.author);
    record.set_f64("score", rating.score);

    Ok(record)
}

pub fn decode_rating(record: &Record) -> Result<Rating, Error> {
    Ok(Rating {
        author: record.require_str("author")?.to_string(),
        score: record.require_f64("score")?,
    })
}

pub fn encode_photo(photo: &Photo) -> Result<Record, Error> {
    if photo.url.is_empty() {
        return Err(encode_error("empty photo url"));
    }

    let mut record = Record::new(KIND_PHOTO);
    record.set_str("author", &photo.author);
    record.set_str("url", &photo.url);

    Ok(record)
}

pub fn decode_photo(record: &Record) -> Result<Photo, Error> {
    Ok(Photo {
        author: record.require_str("author")?.to_string(),
        url: record.require_str("url")?.to_string(),
    })
}

// reassembles a place container: the place record plus its append-only
// sub-records; records of unknown kind are left alone
pub fn decode_place_graph(dataset: &Dataset) -> Result<Place, Error> {
    let mut place: Option<Place> = None;
    let mut comments = Vec::new();
    let mut ratings = Vec::new();
    let mut photos = Vec::new();

    for record in &dataset.records {
        match record.kind() {
            Some(KIND_PLACE) => {
                if place.is_none() {
                    place = Some(decode_place(record)?);
                }
            }
            Some(KIND_COMMENT) => comments.push(decode_comment(record)?),
            Some(KIND_RATING) => ratings.push(decode_rating(record)?),
            Some(KIND_PHOTO) => photos.push(decode_photo(record)?),
            _ => {}
        }
    }

    let mut place = place.ok_or_else(|| schema_mismatch_error("container has no place record"))?;
    place.comments = comments;
    place.ratings = ratings;
    place.photos = photos;

    Ok(place)
}

pub fn decode_placemarks(dataset: &Dataset) -> Result<Vec<Placemark>, Error> {
    dataset
        .records
        .iter()
        .filter(|r| r.kind() == Some(KIND_PLACEMARK))
        .map(decode_placemark)
        .collect()
}

pub fn decode_places(dataset: &Dataset) -> Result<Vec<Place>, Error> {
    dataset
        .records
        .iter()
        .filter(|r| r.kind() == Some(KIND_PLACE))
        .map(decode_place)
        .collect()
}
