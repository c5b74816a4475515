//! Request bodies, with or without an uploaded image.
//!
//! Image routes accept `multipart/form-data` (text fields plus one file under
//! the resource's field name) or plain JSON. A received file is written to the
//! media store straight away and held by a [`StagedImage`]; unless the handler
//! commits it after the record is persisted, dropping the guard deletes the
//! file again.

use std::{marker::PhantomData, sync::Arc, time::SystemTime};

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    media::{remove_quietly, MediaStore},
    state::AppState,
};

/// Request size cap for routes that accept an image.
pub const IMAGE_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Binds a resource to its multipart field name and media directory.
pub trait ImageKind: Send + 'static {
    const FIELD: &'static str;
    const DIR: &'static str;
}

/// Profile pictures.
pub enum ProfileImage {}

impl ImageKind for ProfileImage {
    const FIELD: &'static str = "image";
    const DIR: &'static str = "image";
}

pub struct StagedImage {
    media: Arc<dyn MediaStore>,
    path: String,
    committed: bool,
}

impl StagedImage {
    /// Writes `body` under `dir`. Only the image types in [`image_ext`] are
    /// accepted; the client's file name plays no part in the stored name.
    pub async fn stage(
        media: Arc<dyn MediaStore>,
        dir: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<Self, AppError> {
        let ext = content_type.and_then(image_ext).ok_or_else(unsupported_image)?;
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let file_name = format!("{}-{}.{}", millis, Uuid::new_v4().simple(), ext);
        let path = media.put(dir, &file_name, body).await?;
        debug!(%path, "image staged");
        Ok(Self {
            media,
            path,
            committed: false,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Points `slot` at the staged file and returns the path it replaced.
    pub fn swap_into(&self, slot: &mut Option<String>) -> Option<String> {
        slot.replace(self.path.clone())
    }

    /// Keeps the file; call once the record referencing it is stored.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        if !self.committed {
            debug!(path = %self.path, "discarding uncommitted image");
            self.media.discard(&self.path);
        }
    }
}

/// Commits an optional staged image.
pub fn commit(image: Option<StagedImage>) {
    if let Some(image) = image {
        image.commit();
    }
}

/// Commits `image` and deletes the file it replaced, if any.
pub async fn commit_replacing(
    media: &dyn MediaStore,
    image: Option<StagedImage>,
    previous: Option<String>,
) {
    commit(image);
    if let Some(old) = previous {
        remove_quietly(media, &old).await;
    }
}

const UNSUPPORTED_IMAGE: &str = "Only JPEG, PNG, WEBP, GIF or HEIC images are allowed";

fn unsupported_image() -> AppError {
    AppError::bad_request(UNSUPPORTED_IMAGE)
}

/// Stored extension for an allowed image MIME type. JFIF is plain JPEG.
pub(crate) fn image_ext(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/jfif" | "image/pjpeg" => Some("jpeg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// A request body plus the optional image staged from it.
pub struct ImageForm<K> {
    fields: Map<String, Value>,
    image: Option<StagedImage>,
    _kind: PhantomData<K>,
}

impl<K> ImageForm<K> {
    /// Deserializes the text fields into `T`. On failure the staged image is
    /// dropped, and with it the file.
    pub fn into_parts<T: DeserializeOwned>(self) -> Result<(T, Option<StagedImage>), AppError> {
        let body = serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))?;
        Ok((body, self.image))
    }
}

#[async_trait]
impl<K: ImageKind> FromRequest<AppState> for ImageForm<K> {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut fields = Map::new();
        let mut image = None;

        if content_type.starts_with("multipart/form-data") {
            let mut mp = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;
            while let Some(field) = mp
                .next_field()
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?
            {
                let Some(name) = field.name().map(str::to_owned) else {
                    continue;
                };
                if name == K::FIELD {
                    let mime = field.content_type().map(str::to_owned);
                    let body = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    if body.is_empty() {
                        continue;
                    }
                    if mime.as_deref().and_then(image_ext).is_none() {
                        warn!(field = %name, mime = ?mime, "rejected non-image upload");
                        return Err(unsupported_image());
                    }
                    // A second file replaces the first; the first guard drops here.
                    image = Some(
                        StagedImage::stage(
                            state.media.clone(),
                            K::DIR,
                            mime.as_deref(),
                            body,
                        )
                        .await?,
                    );
                } else {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    fields.insert(name, Value::String(text));
                }
            }
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::bad_request(e.body_text()))?;
            fields = body;
        }

        Ok(Self {
            fields,
            image,
            _kind: PhantomData,
        })
    }
}

/// JSON body whose rejections use the response envelope.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        Ok(Self(body))
    }
}
