use async_trait::async_trait;
use uuid::Uuid;

use crate::codec::{self, Dataset, Record};
use crate::entities::{Comment, Photo, Place, Placemark, Rating};
use crate::error::Error;

// all of a user's placemarks live under one fixed path below the storage root
pub const PLACEMARKS_SEGMENT: &str = "public/placemarks";
pub const PLACES_SEGMENT: &str = "public/places";

pub fn placemarks_locator(storage_root: &str) -> String {
    format!("{}/{}", storage_root.trim_end_matches('/'), PLACEMARKS_SEGMENT)
}

pub fn place_locator(storage_root: &str, id: Uuid) -> String {
    format!(
        "{}/{}/{}",
        storage_root.trim_end_matches('/'),
        PLACES_SEGMENT,
        id
    )
}

// whole-resource GET/PUT; there is no partial-patch operation at this layer
#[async_trait]
pub trait ContainerTransport {
    async fn get(&self, locator: &str) -> Result<String, Error>;
    async fn put(&self, locator: &str, body: String) -> Result<(), Error>;
}

#[derive(Debug)]
pub struct ContainerStore<T> {
    transport: T,
}

impl<T: ContainerTransport + Send + Sync> ContainerStore<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // probe first, then write the whole container back: a container either
    // does not exist yet or already holds prior records. The probe and the
    // write are two requests, so concurrent first writes can still race
    // (see DESIGN.md).
    #[tracing::instrument(skip(self, record))]
    pub async fn persist(&self, record: Record, locator: &str) -> Result<(), Error> {
        let mut dataset = match self.transport.get(locator).await {
            Ok(body) => serde_json::from_str(&body)?,
            Err(err) if err.is_not_found() => Dataset::new(),
            Err(err) => return Err(err),
        };

        dataset.insert(record);

        let body = serde_json::to_string(&dataset)?;
        self.transport.put(locator, body).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, locator: &str) -> Result<Dataset, Error> {
        let body = self.transport.get(locator).await?;

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn save_placemark(&self, placemark: &Placemark, locator: &str) -> Result<(), Error> {
        let record = codec::encode_placemark(placemark)?;

        self.persist(record, locator).await
    }

    pub async fn save_place(&self, place: &Place, locator: &str) -> Result<(), Error> {
        let record = codec::encode_place(place)?;

        self.persist(record, locator).await
    }

    pub async fn add_comment(&self, comment: &Comment, locator: &str) -> Result<(), Error> {
        let record = codec::encode_comment(comment)?;

        self.persist(record, locator).await
    }

    pub async fn add_rating(&self, rating: &Rating, locator: &str) -> Result<(), Error> {
        let record = codec::encode_rating(rating)?;

        self.persist(record, locator).await
    }

    pub async fn add_photo(&self, photo: &Photo, locator: &str) -> Result<(), Error> {
        let record = codec::encode_photo(photo)?;

        self.persist(record, locator).await
    }

    // place data is never cached; every detail view goes back to the container
    pub async fn fetch_place(&self, locator: &str) -> Result<Place, Error> {
        let dataset = self.fetch(locator).await?;

        codec::decode_place_graph(&dataset)
    }

    pub async fn fetch_placemarks(&self, locator: &str) -> Result<Vec<Placemark>, Error> {
        let dataset = self.fetch(locator).await?;

        codec::decode_placemarks(&dataset)
    }
}
