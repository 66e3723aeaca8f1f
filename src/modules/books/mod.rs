pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};

use store::{BookStore, InMemoryBookStore};

/// Books module: the lending endpoints over a [`BookStore`].
pub struct BooksModule {
    store: Arc<dyn BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.list().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = books.len(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let message = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Message" }
                    }
                }
            })
        };
        let book = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let id_query = serde_json::json!([{
            "name": "id",
            "in": "query",
            "required": true,
            "schema": { "type": "string" }
        }]);

        Some(serde_json::json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books in insertion order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "responses": {
                            "201": book("Created book"),
                            "400": { "description": "Malformed request body" },
                            "409": message("A book with this id already exists")
                        }
                    }
                },
                "/books/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": book("The book"),
                            "404": message("Book not found")
                        }
                    }
                },
                "/checkout": {
                    "patch": {
                        "summary": "Check out one copy of a book",
                        "tags": ["Books"],
                        "parameters": id_query.clone(),
                        "responses": {
                            "200": book("Updated book"),
                            "400": message("Missing id query parameter"),
                            "404": message("Book not found"),
                            "409": message("Book out of stock")
                        }
                    }
                },
                "/return": {
                    "patch": {
                        "summary": "Return one copy of a book",
                        "tags": ["Books"],
                        "parameters": id_query,
                        "responses": {
                            "200": book("Updated book"),
                            "400": message("Missing id query parameter"),
                            "404": message("Book not found"),
                            "409": message("Book quantity at maximum")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "description": "Identifier assigned by the client"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "quantity": {
                                "type": "integer",
                                "default": 0,
                                "format": "int64",
                                "description": "Copies available for checkout"
                            }
                        }
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

/// Create the books module over a freshly seeded in-memory store
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new(Arc::new(InMemoryBookStore::seeded())))
}
