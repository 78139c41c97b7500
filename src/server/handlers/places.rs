use axum::extract::{Extension, Json};
use serde::Serialize;

use crate::api::DynAPI;
use crate::entities::Place;
use crate::error::Error;

#[derive(Serialize)]
pub struct PlacesResponse {
    places: Vec<Place>,
}

// a failure here renders an explicit error body instead of an empty reply
pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<PlacesResponse>, Error> {
    let places = api.list_places().await?;

    Ok(Json(PlacesResponse { places }))
}
