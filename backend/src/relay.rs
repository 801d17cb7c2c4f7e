use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use futures::TryStreamExt;
use log::{error, info};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use shared::model::is_image_type;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No file provided in field 'file'")]
    MissingFile,
    #[error("Unsupported file type: {0}")]
    NotAnImage(String),
    #[error("Upload error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Prediction service unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingFile | RelayError::Multipart(_) => StatusCode::BAD_REQUEST,
            RelayError::NotAnImage(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

pub struct Upload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Pulls the `file` field out of the form. Other fields are drained and ignored.
pub async fn read_upload(mut payload: Multipart) -> Result<Upload, RelayError> {
    let mut upload = None;

    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some("file") || upload.is_some() {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();
        let mime_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        let bytes = read_field(&mut field).await?;
        upload = Some(Upload { filename, mime_type, bytes });
    }

    let upload = upload.ok_or(RelayError::MissingFile)?;
    if !is_image_type(&upload.mime_type) {
        return Err(RelayError::NotAnImage(upload.mime_type));
    }
    Ok(upload)
}

async fn read_field(field: &mut Field) -> Result<Vec<u8>, RelayError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Forwards the upload once; status and body of the upstream pass through.
pub async fn forward(client: &reqwest::Client, upstream: &Url, upload: Upload) -> Result<HttpResponse, RelayError> {
    info!(
        "Relaying {} ({}, {} bytes) to {}",
        upload.filename,
        upload.mime_type,
        upload.bytes.len(),
        upstream
    );

    let part = Part::bytes(upload.bytes)
        .file_name(upload.filename)
        .mime_str(&upload.mime_type)
        .map_err(|e| {
            error!("Rejecting content type {:?}: {}", upload.mime_type, e);
            RelayError::NotAnImage(upload.mime_type.clone())
        })?;
    let response = client
        .post(upstream.as_str())
        .multipart(Form::new().part("file", part))
        .send()
        .await
        .map_err(|e| {
            error!("Prediction service request failed: {}", e);
            RelayError::Upstream(e)
        })?;

    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/json")
        .to_string();
    let body = response.bytes().await?;

    if !status.is_success() {
        error!("Prediction service answered {}", status);
    }
    Ok(HttpResponse::build(status).content_type(content_type).body(body.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(mime_type: &str) -> Upload {
        Upload {
            filename: "scan.png".to_string(),
            mime_type: mime_type.to_string(),
            bytes: b"\x89PNG".to_vec(),
        }
    }

    #[actix_web::test]
    async fn test_unparsable_content_type_is_unsupported() {
        let upstream = Url::parse("http://127.0.0.1:9/predict/").unwrap();
        let Err(err) = forward(&reqwest::Client::new(), &upstream, upload("image/pn@g")).await else {
            panic!("malformed content type was relayed");
        };

        assert!(matches!(err, RelayError::NotAnImage(ref mime) if mime == "image/pn@g"));
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
