use async_trait::async_trait;

use crate::api::{PlaceAPI, API};
use crate::codec;
use crate::container::{ContainerStore, ContainerTransport};
use crate::entities::Place;
use crate::error::Error;

// serves the shared public catalog of places over the same container store
#[derive(Debug)]
pub struct Engine<T> {
    store: ContainerStore<T>,
    catalog_locator: String,
}

impl<T: ContainerTransport + Send + Sync> Engine<T> {
    pub fn new(store: ContainerStore<T>, catalog_locator: String) -> Self {
        Self {
            store,
            catalog_locator,
        }
    }
}

#[async_trait]
impl<T: ContainerTransport + Send + Sync> PlaceAPI for Engine<T> {
    #[tracing::instrument(skip(self))]
    async fn list_places(&self) -> Result<Vec<Place>, Error> {
        let dataset = match self.store.fetch(&self.catalog_locator).await {
            Ok(dataset) => dataset,
            // a catalog nobody has written to yet lists as empty
            Err(err) if err.is_not_found() => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        codec::decode_places(&dataset)
    }
}

impl<T: ContainerTransport + Send + Sync> API for Engine<T> {}
