// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image upload gateway (multipart).

use super::api::ApiClient;
use crate::error::{ApiError, Result};
use crate::models::{UploadFile, UploadedImage};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;

#[derive(Deserialize)]
struct SingleUploadResponse {
    #[serde(alias = "data")]
    image: UploadedImage,
}

#[derive(Deserialize)]
struct MultipleUploadResponse {
    #[serde(default)]
    images: Vec<UploadedImage>,
}

/// Gateway for `/upload` endpoints. Every call requires a session.
#[derive(Clone)]
pub struct UploadsService {
    client: ApiClient,
}

impl UploadsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn upload_single(&self, file: UploadFile) -> Result<UploadedImage> {
        self.client.require_session()?;

        let form = Form::new().part("image", file_part(file)?);
        let response: SingleUploadResponse = self
            .client
            .send_json(self.client.request(Method::POST, "/upload/single").multipart(form))
            .await?;

        tracing::info!(public_id = %response.image.public_id, "Image uploaded");
        Ok(response.image)
    }

    pub async fn upload_multiple(&self, files: Vec<UploadFile>) -> Result<Vec<UploadedImage>> {
        self.client.require_session()?;
        if files.is_empty() {
            return Err(ApiError::Validation("Select at least one image".to_string()));
        }

        let mut form = Form::new();
        for file in files {
            form = form.part("images", file_part(file)?);
        }

        let response: MultipleUploadResponse = self
            .client
            .send_json(self.client.request(Method::POST, "/upload/multiple").multipart(form))
            .await?;

        tracing::info!(count = response.images.len(), "Images uploaded");
        Ok(response.images)
    }

    /// Delete a hosted image by its public id.
    pub async fn delete(&self, public_id: &str) -> Result<()> {
        self.client.require_session()?;

        let path = format!("/upload/{}", urlencoding::encode(public_id));
        self.client
            .send(self.client.request(Method::DELETE, &path))
            .await?;
        Ok(())
    }
}

fn file_part(file: UploadFile) -> Result<Part> {
    Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.content_type)
        .map_err(|e| ApiError::Validation(format!("Invalid content type: {}", e)))
}
