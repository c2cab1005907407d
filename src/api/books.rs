//! Book loan endpoints

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult, ErrorResponse, BODY_TOO_LARGE, INVALID_BODY},
    models::{
        book::Book,
        envelope::{RequestEnvelope, ResponseEnvelope},
    },
    AppState,
};

/// Buffered body; oversized or unreadable bodies become client errors
fn buffered(body: Result<Bytes, BytesRejection>) -> AppResult<Bytes> {
    body.map_err(|rejection| {
        tracing::debug!("Unreadable request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::bad_request(BODY_TOO_LARGE)
        } else {
            AppError::bad_request(INVALID_BODY)
        }
    })
}

/// Raw operation request wrapped the way the gateway would
fn request_envelope(body: Result<Bytes, BytesRejection>) -> AppResult<RequestEnvelope> {
    let bytes = buffered(body)?;
    if bytes.is_empty() {
        return Ok(RequestEnvelope::default());
    }

    String::from_utf8(bytes.to_vec())
        .map(RequestEnvelope::new)
        .map_err(|_| AppError::bad_request(INVALID_BODY))
}

/// Create, update or delete a book loan
///
/// The raw body is the operation request; the response status and body are
/// those of the dispatcher's envelope.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body(
        content = String,
        content_type = "application/json",
        description = "JSON object with `operation` (create | update | delete) and its fields"
    ),
    responses(
        (status = 200, description = "Operation applied"),
        (status = 400, description = "Missing or invalid operation or field", body = ErrorResponse),
        (status = 500, description = "Storage fault", body = ErrorResponse)
    )
)]
pub async fn book_request(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ResponseEnvelope {
    match request_envelope(body) {
        Ok(envelope) => state.services.books.handle(&envelope).await,
        Err(e) => ResponseEnvelope::from_error(&e),
    }
}

/// Gateway-style invocation: envelope in, envelope out
///
/// Always answers 200; an envelope that cannot be read comes back as a 400
/// response envelope.
#[utoipa::path(
    post,
    path = "/invoke",
    tag = "books",
    request_body = RequestEnvelope,
    responses(
        (
            status = 200,
            description = "Response envelope, whatever the operation outcome",
            body = ResponseEnvelope
        )
    )
)]
pub async fn invoke(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<ResponseEnvelope> {
    let envelope = buffered(body).and_then(|bytes| {
        serde_json::from_slice::<RequestEnvelope>(&bytes)
            .map_err(|_| AppError::bad_request(INVALID_BODY))
    });

    match envelope {
        Ok(envelope) => Json(state.services.books.handle(&envelope).await),
        Err(e) => Json(ResponseEnvelope::from_error(&e)),
    }
}

/// Get a book loan by id
#[utoipa::path(
    get,
    path = "/books/{book_id}",
    tag = "books",
    params(
        ("book_id" = String, Path, description = "Book loan ID")
    ),
    responses(
        (status = 200, description = "Book loan record", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_book(&book_id).await?;
    Ok(Json(book))
}
