use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::Place;
use crate::error::Error;

#[async_trait]
pub trait PlaceAPI {
    async fn list_places(&self) -> Result<Vec<Place>, Error>;
}

pub trait API: PlaceAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
