//! Document routes — multipart upload to object storage, signed downloads.
//!
//! GET    /api/flights/{flight_id}/documents   — List a flight's documents
//! POST   /api/flights/{flight_id}/documents   — Upload (multipart/form-data)
//! GET    /api/documents/{document_id}/download — Short-lived signed URL
//! DELETE /api/documents/{document_id}          — Remove a document

use axum::{
    extract::{Extension, Multipart, Path, State},
    middleware,
    routing::{delete, get},
    Json, Router,
};
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use skyferry_common::{
    config,
    error::{FerryError, FerryResult},
    ids,
    models::document::{Document, DocumentType, DownloadResponse},
    permissions::Permissions,
};
use skyferry_db::repository::documents;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    access::{self, Caller},
    middleware::AuthContext,
    AppState,
};

/// Scans, office documents and images. Executables are rejected server-side.
fn is_allowed_content_type(ct: &str) -> bool {
    matches!(
        ct,
        "application/pdf"
            | "image/jpeg"
            | "image/png"
            | "image/tiff"
            | "image/heic"
            | "image/webp"
            | "text/plain"
            | "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/flights/{flight_id}/documents",
            get(list_documents).post(upload_document),
        )
        .route("/documents/{document_id}/download", get(download_document))
        .route("/documents/{document_id}", delete(delete_document))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// Load a document through its flight so organization scoping applies.
async fn load(state: &AppState, caller: &Caller, document_id: Uuid) -> FerryResult<Document> {
    let doc = documents::find_by_id(&state.db.pool, document_id)
        .await?
        .ok_or_else(|| FerryError::not_found("Document"))?;
    access::flight(state, caller, doc.ferry_flight_id).await?;
    Ok(doc)
}

/// GET /api/flights/{flight_id}/documents
async fn list_documents(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
) -> FerryResult<Json<Vec<Document>>> {
    let caller = access::caller(&state, &auth).await?;
    access::flight(&state, &caller, flight_id).await?;
    let docs = documents::list_for_flight(&state.db.pool, flight_id).await?;
    Ok(Json(docs))
}

/// An upload as read from the multipart body.
struct Upload {
    data: Vec<u8>,
    filename: String,
    content_type: String,
    document_type: DocumentType,
    expires_on: Option<NaiveDate>,
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> FerryError {
    FerryError::Validation {
        message: format!("Multipart error: {e}"),
    }
}

/// Read the `file`, `document_type` and `expires_on` fields.
async fn read_upload(mut multipart: Multipart, max_bytes: u64) -> FerryResult<Upload> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut document_type: Option<DocumentType> = None;
    let mut expires_on: Option<NaiveDate> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let filename = sanitize_filename(field.file_name().unwrap_or("document"));
                // Browsers often send octet-stream; fall back to the extension.
                let content_type = match field.content_type() {
                    Some(ct) if ct != "application/octet-stream" => ct.to_string(),
                    _ => mime_guess::from_path(&filename)
                        .first_or_octet_stream()
                        .essence_str()
                        .to_string(),
                };

                if !is_allowed_content_type(&content_type) {
                    return Err(FerryError::Validation {
                        message: format!("File type '{content_type}' is not allowed"),
                    });
                }

                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() as u64 > max_bytes {
                    return Err(FerryError::Validation {
                        message: format!(
                            "File too large: {} bytes (max {max_bytes} bytes)",
                            bytes.len()
                        ),
                    });
                }
                if bytes.is_empty() {
                    return Err(FerryError::Validation {
                        message: "Uploaded file is empty".into(),
                    });
                }

                file = Some((bytes.to_vec(), filename, content_type));
            }
            Some("document_type") => {
                let value = field.text().await.map_err(multipart_error)?;
                document_type = Some(value.parse()?);
            }
            Some("expires_on") => {
                let value = field.text().await.map_err(multipart_error)?;
                let value = value.trim();
                if !value.is_empty() {
                    expires_on = Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(
                        |_| FerryError::Validation {
                            message: "expires_on must be a YYYY-MM-DD date".into(),
                        },
                    )?);
                }
            }
            _ => {}
        }
    }

    let (data, filename, content_type) = file.ok_or(FerryError::Validation {
        message: "No file field in request".into(),
    })?;
    let document_type = document_type.ok_or(FerryError::Validation {
        message: "document_type is required".into(),
    })?;

    Ok(Upload {
        data,
        filename,
        content_type,
        document_type,
        expires_on,
    })
}

/// POST /api/flights/{flight_id}/documents
async fn upload_document(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(flight_id): Path<Uuid>,
    multipart: Multipart,
) -> FerryResult<Json<Document>> {
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::UPLOAD_DOCUMENTS)?;
    access::flight(&state, &caller, flight_id).await?;

    let upload = read_upload(multipart, config::get().limits.max_document_bytes).await?;

    let size = upload.data.len() as i64;
    let sha256 = hex::encode(Sha256::digest(&upload.data));
    let document_id = ids::generate_id();
    let storage_key = ids::document_storage_key(flight_id, document_id, &upload.filename);

    state
        .storage
        .put_object(&storage_key, upload.data, &upload.content_type)
        .await
        .map_err(FerryError::Storage)?;

    let doc = match documents::create_document(
        &state.db.pool,
        document_id,
        flight_id,
        caller.user_id,
        upload.document_type.as_str(),
        &upload.filename,
        &upload.content_type,
        size,
        &storage_key,
        &sha256,
        upload.expires_on,
    )
    .await
    {
        Ok(doc) => doc,
        Err(e) => {
            state
                .storage
                .delete_objects_best_effort(std::slice::from_ref(&storage_key))
                .await;
            return Err(e.into());
        }
    };

    access::record(
        &state,
        &caller,
        Some(flight_id),
        "document.uploaded",
        "document",
        doc.id,
        serde_json::json!({
            "document_type": doc.document_type,
            "filename": doc.filename,
            "size": doc.size,
        }),
    )
    .await;

    tracing::info!(
        document_id = %doc.id,
        flight_id = %flight_id,
        size,
        content_type = %doc.content_type,
        "Document uploaded"
    );

    Ok(Json(doc))
}

/// GET /api/documents/{document_id}/download
async fn download_document(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<Uuid>,
) -> FerryResult<Json<DownloadResponse>> {
    let caller = access::caller(&state, &auth).await?;
    let doc = load(&state, &caller, document_id).await?;

    let expires_in = config::get().storage.signed_url_ttl_secs;
    let url = state
        .storage
        .presigned_get_url(&doc.storage_key, expires_in)
        .await
        .map_err(FerryError::Storage)?;

    Ok(Json(DownloadResponse {
        url,
        filename: doc.filename,
        expires_in,
    }))
}

/// DELETE /api/documents/{document_id}
async fn delete_document(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<Uuid>,
) -> FerryResult<Json<serde_json::Value>> {
    let caller = access::caller(&state, &auth).await?;
    let doc = load(&state, &caller, document_id).await?;
    caller.require(Permissions::UPLOAD_DOCUMENTS)?;

    if !documents::delete_document(&state.db.pool, document_id).await? {
        return Err(FerryError::not_found("Document"));
    }
    state
        .storage
        .delete_objects_best_effort(std::slice::from_ref(&doc.storage_key))
        .await;

    access::record(
        &state,
        &caller,
        Some(doc.ferry_flight_id),
        "document.deleted",
        "document",
        document_id,
        serde_json::json!({ "filename": doc.filename }),
    )
    .await;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Strip path separators and control characters from filenames.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\') && !c.is_control())
        .take(255)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_filename("reg\0istration.pdf"), "registration.pdf");
        assert_eq!(sanitize_filename("  "), "document");
        assert_eq!(sanitize_filename(".."), "document");
        assert_eq!(sanitize_filename("N172EX airworthiness.pdf"), "N172EX airworthiness.pdf");
    }

    #[test]
    fn long_filenames_are_truncated() {
        let name = "a".repeat(400);
        assert_eq!(sanitize_filename(&name).len(), 255);
    }

    #[test]
    fn content_type_allow_list() {
        assert!(is_allowed_content_type("application/pdf"));
        assert!(is_allowed_content_type("image/jpeg"));
        assert!(!is_allowed_content_type("application/x-msdownload"));
        assert!(!is_allowed_content_type("text/html"));
        assert!(!is_allowed_content_type("application/octet-stream"));
    }
}
