//! The app object: route table, media type, info skeleton and middleware.
//!
//! An earlier revision of this system kept the `info` skeleton as process-wide
//! mutable state. Here it is plain data owned by the [`App`], threaded
//! explicitly through setup and document builds.

use serde_json::{Map, Value};

use crate::http::{Method, Middleware, Request, Response, CORS_HEADERS};
use crate::metadata::Handler;
use crate::router::Router;

pub const DEFAULT_MEDIA_TYPE: &str = "application/json; charset=UTF-8";

pub struct App {
    router: Router,
    media_type: String,
    info: Map<String, Value>,
    middleware: Vec<Box<dyn Middleware>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
            info: Map::new(),
            middleware: Vec::new(),
        }
    }

    pub fn with_media_type(mut self, media_type: &str) -> Self {
        self.media_type = media_type.to_string();
        self
    }

    pub fn add_route(&mut self, path: &str, handler: Handler) {
        self.router.add_route(path, handler);
    }

    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The `info` block of the assembled document, seeded by
    /// [`crate::docs::attach_docs`].
    pub fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    pub(crate) fn info_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.info
    }

    /// Dispatches one request: middleware hooks first, then the pre-flight
    /// answer for any routed path, then the verb entry point. Unrouted paths
    /// get a 404, routed paths without the requested verb a 405.
    pub fn handle(&self, req: &Request) -> Response {
        let mut resp = Response::new();
        for middleware in &self.middleware {
            middleware.process_request(req, &mut resp);
        }

        let Some(handler) = self.router.find(req.path()) else {
            resp.status = 404;
            return resp;
        };

        if req.method() == Method::Options {
            for (name, value) in CORS_HEADERS {
                resp.set_header(name, value);
            }
            return resp;
        }

        match handler.entry_point(req.method()) {
            Some(entry_point) => (entry_point.callback)(self, req, &mut resp),
            None => resp.status = 405,
        }
        resp
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
