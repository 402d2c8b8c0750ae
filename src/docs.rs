//! Setup interface and the HTTP exposure resource for the swagger document.

use std::sync::{Arc, Mutex};

use log::{info, warn};
use serde_json::{json, Map, Value};

use crate::app::App;
use crate::document::{build_document, DOCS_PATH};
use crate::error::{Error, Result};
use crate::http::{Method, Middleware, Request, Response};
use crate::metadata::{Handler, Metadata};

/// Request header read by the docs endpoint as a path prefix, for services
/// sitting behind a path-rewriting gateway.
pub const PREFIX_HEADER: &str = "X-Forwarded-Path";

/// Query flag that forces a rebuild of the cached document.
pub const REFRESH_FLAG: &str = "refresh";

/// Injects the permissive cross-origin header on every request.
pub struct CorsMiddleware;

impl Middleware for CorsMiddleware {
    fn process_request(&self, _req: &Request, resp: &mut Response) {
        resp.set_header("Access-Control-Allow-Origin", "*");
    }
}

/// Registers the docs endpoint at [`DOCS_PATH`], installs [`CorsMiddleware`]
/// and seeds the document's `info` skeleton with the service name, version
/// and any extra free-form fields.
///
/// Called once at service startup. Calling it again, or calling it when
/// something else is already routed at [`DOCS_PATH`], is a configuration
/// error.
///
/// The endpoint serves the document as JSON and caches the serialized body.
/// The cache is rebuilt when empty or when the [`REFRESH_FLAG`] query flag is
/// set, using the [`PREFIX_HEADER`] of the triggering request as the path
/// prefix. Rebuilds are idempotent, so a concurrent double rebuild costs only
/// redundant work.
pub fn attach_docs(
    app: &mut App,
    name: &str,
    version: &str,
    extra_info: Map<String, Value>,
) -> Result<()> {
    if app.router().find(DOCS_PATH).is_some() {
        return Err(Error::Configuration(format!(
            "{} is already routed; attach_docs may only be called once",
            DOCS_PATH
        )));
    }

    let mut skeleton = Map::new();
    skeleton.insert("name".to_string(), Value::String(name.to_string()));
    skeleton.insert("version".to_string(), Value::String(version.to_string()));
    skeleton.extend(extra_info);
    *app.info_mut() = skeleton;

    app.add_middleware(Box::new(CorsMiddleware));
    app.add_route(DOCS_PATH, docs_handler());
    info!("swagger document attached at {}", DOCS_PATH);
    Ok(())
}

fn docs_handler() -> Handler {
    let cache: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let annotation = Metadata::new()
        .summary("service documentation")
        .response(json!({"description": "the swagger document"}));

    Handler::new("SwaggerResource").documented(Method::Get, annotation, move |app, req, resp| {
        let refresh = req.query_flag(REFRESH_FLAG);
        let prefix = req.header(PREFIX_HEADER).map(str::to_owned);

        let mut cached = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if cached.is_none() || refresh {
            let document = build_document(app, prefix.as_deref());
            match serde_json::to_string(&document) {
                Ok(body) => *cached = Some(body),
                Err(e) => {
                    warn!("failed to serialize swagger document: {}", e);
                    resp.status = 500;
                    return;
                }
            }
        }

        resp.set_header("Content-Type", app.media_type());
        resp.body = cached.clone();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SwaggerDocument;
    use pretty_assertions::assert_eq;

    fn item_handler() -> Handler {
        Handler::new("ItemResource").documented(
            Method::Get,
            Metadata::new()
                .summary("Get item")
                .response(json!({"description": "the item"})),
            |_app, _req, _resp| {},
        )
    }

    fn docs_app() -> App {
        let mut app = App::new();
        attach_docs(&mut app, "test-api", "1.0.0", Map::new()).unwrap();
        app.add_route("/items", item_handler());
        app
    }

    fn served_document(app: &App, req: &Request) -> SwaggerDocument {
        let resp = app.handle(req);
        assert_eq!(resp.status, 200);
        serde_json::from_str(resp.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_attach_docs_seeds_info() {
        let mut app = App::new();
        let extra = Metadata::from_value(json!({"host": "localhost"})).as_map().clone();
        attach_docs(&mut app, "test-api", "2.0.0", extra).unwrap();

        assert_eq!(json!(app.info()), json!({
            "name": "test-api",
            "version": "2.0.0",
            "host": "localhost"
        }));
    }

    #[test]
    fn test_attach_docs_twice_is_a_configuration_error() {
        let mut app = App::new();
        attach_docs(&mut app, "test-api", "1.0.0", Map::new()).unwrap();

        let err = attach_docs(&mut app, "test-api", "1.0.0", Map::new()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_get_serves_document_with_cors_header() {
        let app = docs_app();
        let resp = app.handle(&Request::new(Method::Get, DOCS_PATH));

        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            resp.header("Content-Type"),
            Some("application/json; charset=UTF-8")
        );

        let document: SwaggerDocument = serde_json::from_str(resp.body.as_deref().unwrap()).unwrap();
        assert_eq!(document.swagger, "2.0");
        assert!(document.paths.contains_key("/items"));
        assert!(!document.paths.contains_key(DOCS_PATH));
    }

    #[test]
    fn test_document_is_cached_until_refresh_is_requested() {
        let app = docs_app();

        // First request fills the cache without a prefix.
        let first = app.handle(&Request::new(Method::Get, DOCS_PATH));
        // A prefix header alone does not invalidate the cache.
        let second = app.handle(&Request::new(Method::Get, DOCS_PATH).with_header(PREFIX_HEADER, "/api"));
        assert_eq!(second.body, first.body);

        // The refresh flag forces a rebuild, which picks up the prefix.
        let rebuilt = served_document(
            &app,
            &Request::new(Method::Get, DOCS_PATH)
                .with_header(PREFIX_HEADER, "/api")
                .with_query(REFRESH_FLAG, ""),
        );
        assert!(rebuilt.paths.contains_key("/api/items"));
        assert!(!rebuilt.paths.contains_key("/items"));
    }

    #[test]
    fn test_options_preflight_on_docs_path() {
        let app = docs_app();
        let resp = app.handle(&Request::new(Method::Options, DOCS_PATH));

        assert_eq!(resp.status, 200);
        assert!(resp.body.is_none());
        assert_eq!(
            resp.header("Access-Control-Allow-Methods"),
            Some("POST, GET, PUT, DELETE, OPTIONS")
        );
    }

    #[test]
    fn test_cors_middleware_applies_to_annotated_routes() {
        let app = docs_app();
        let resp = app.handle(&Request::new(Method::Get, "/items"));
        assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
    }
}
