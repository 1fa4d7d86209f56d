pub mod codec;
pub mod models;
pub mod price;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use bookservice_http::error::AppError;
use bookservice_kernel::{InitCtx, Module};
use serde_json::json;

pub use codec::{BookCodec, CodecError, CodecOptions};
pub use models::UpdateBookDto;

/// Books module: owns the update-book wire contract and its endpoint
pub struct BooksModule {
    codec: BookCodec,
}

impl BooksModule {
    pub const fn new(codec: BookCodec) -> Self {
        Self { codec }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            accept_string_price = self.codec.options().accept_string_price,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/{id}", put(update_book))
            .with_state(self.codec)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/{id}": {
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBookDto" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Accepted update, canonical encoding",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/UpdateBookDto" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Malformed or invalid body",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {
                                    "text/plain": { "schema": { "type": "string" } }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "UpdateBookDto": {
                        "type": "object",
                        "properties": {
                            "authorName": {
                                "type": "string",
                                "description": "Name of the book's author"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "price": {
                                "type": "number",
                                "description": "Exact decimal price, e.g. 29.99"
                            }
                        },
                        "required": ["authorName", "title", "price"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// Update book endpoint
///
/// Persistence lives outside this service; the accepted record is echoed back
/// in canonical form.
async fn update_book(
    State(codec): State<BookCodec>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let text = std::str::from_utf8(&body).map_err(|err| {
        AppError::bad_request(
            vec![json!({ "error": "decoding_error" })],
            format!("request body is not valid UTF-8: {err}"),
        )
    })?;
    let dto = codec.decode(text)?;

    tracing::info!(
        book_id = %id,
        author_name = %dto.author_name,
        title = %dto.title,
        price = %dto.price,
        "book update accepted"
    );

    let encoded = codec.encode(&dto)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], encoded))
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Encoding(source) => {
                AppError::Internal(anyhow::Error::new(source).context("failed to encode book update"))
            }
            other => {
                let mut detail = json!({ "error": other.kind() });
                if let Some(field) = other.field() {
                    detail["field"] = json!(field);
                }
                AppError::bad_request(vec![detail], other.to_string())
            }
        }
    }
}

/// Create a new instance of the books module
pub fn create_module(codec: BookCodec) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(codec))
}
