//! Swagger document generation from a running app's route table.
//!
//! This library walks an app's route tree, reads the metadata record attached
//! to each handler's verb entry points, expands a few convenience shorthands
//! into strict OpenAPI ("swagger") 2.0 shape and serializes the result to
//! JSON. It also ships the endpoint that serves the document over HTTP with
//! permissive cross-origin headers.
//!
//! It is a descriptive tool only: no schema validation, no request validation
//! at runtime, no OpenAPI 3.x.
//!
//! # Architecture
//!
//! 1. [`metadata`] - Declarative handler records pairing callbacks with
//!    annotations
//! 2. [`router`] - The route tree and the walker that flattens it
//! 3. [`expand`] - Shorthand expansion of raw metadata records
//! 4. [`document`] - Assembly of the swagger 2.0 document
//! 5. [`docs`] - Setup interface and the serving endpoint
//! 6. [`serializer`] - JSON/YAML output
//! 7. [`cli`] - Embeddable command-line runner
//!
//! # Example Usage
//!
//! ```
//! use openapi_from_routes::{
//!     app::App,
//!     docs::attach_docs,
//!     document::build_document,
//!     http::Method,
//!     metadata::{Handler, Metadata},
//! };
//! use serde_json::{json, Map};
//!
//! let mut app = App::new();
//! attach_docs(&mut app, "campaign-api", "1.0.0", Map::new()).unwrap();
//!
//! app.add_route(
//!     "/campaigns/{id}",
//!     Handler::new("CampaignResource").documented(
//!         Method::Get,
//!         Metadata::new()
//!             .summary("Get a campaign")
//!             .parameter("id", json!({"type": "integer"}))
//!             .response(json!({"description": "the campaign"})),
//!         |_app, _req, resp| {
//!             resp.body = Some("{}".to_string());
//!         },
//!     ),
//! );
//!
//! let document = build_document(&app, None);
//! assert!(document.paths.contains_key("/campaigns/{id}"));
//! ```

pub mod app;
pub mod cli;
pub mod docs;
pub mod document;
pub mod error;
pub mod expand;
pub mod http;
pub mod metadata;
pub mod router;
pub mod serializer;
