use super::types::TryOnResponse;
use crate::{
    Error, Result,
    relay::{Relay, TryOnInput},
};
use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

pub async fn tryon(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<TryOnResponse>> {
    let multipart = multipart.map_err(|rejection| {
        debug!("Request body is not multipart: {}", rejection);
        Error::MissingInput
    })?;

    let input = read_form(multipart).await?;
    let result = state.relay.try_on(input).await?;

    Ok(Json(result.into()))
}

/// Collects the try-on fields. Image fields only count when they carry a
/// file name, as browsers send an unnamed empty part for an empty file input.
/// `description` must be a plain field; the first occurrence wins.
async fn read_form(mut multipart: Multipart) -> Result<TryOnInput> {
    let mut input = TryOnInput::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let has_file = field.file_name().is_some_and(|file_name| !file_name.is_empty());

        match name.as_str() {
            "human" if has_file => input.human = Some(field.bytes().await?.to_vec()),
            "garment" if has_file => input.garment = Some(field.bytes().await?.to_vec()),
            "description" if !has_file && input.description.is_none() => {
                input.description = Some(field.text().await?)
            }
            other => debug!("Ignoring multipart field '{}'", other),
        }
    }

    Ok(input)
}
