//! Document assembly: walking the route table and merging normalized records
//! into one swagger 2.0 document.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::app::App;
use crate::expand::normalize;
use crate::http::Method;
use crate::router::walk;

/// Well-known path the assembled document is served at, and the one path the
/// assembler always skips to avoid describing itself.
pub const DOCS_PATH: &str = "/swagger.json";

/// The assembled swagger 2.0 document.
///
/// `paths` is a `BTreeMap`, so path keys are lexically sorted by construction
/// regardless of route registration order. The per-path value maps verb to the
/// normalized metadata record, verbs in `get`/`post`/`put`/`delete` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    pub swagger: String,
    pub info: Map<String, Value>,
    pub produces: Vec<String>,
    pub paths: BTreeMap<String, Map<String, Value>>,
}

/// Builds the document from the app's route table.
///
/// Per-verb normalization failures (no annotation, or no response shape) drop
/// only that verb, with a warning; a path whose every implemented verb was
/// dropped is omitted entirely. The build itself always succeeds. When
/// `path_prefix` is given, every path key is rewritten with it, which supports
/// serving behind a path-rewriting gateway; the `info` block is unaffected.
pub fn build_document(app: &App, path_prefix: Option<&str>) -> SwaggerDocument {
    let mut pairs = walk(app.router().roots(), "");
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    debug!("walked {} bound routes", pairs.len());

    let mut paths = BTreeMap::new();
    for (path, handler) in pairs {
        if path == DOCS_PATH {
            continue;
        }

        let mut operations = Map::new();
        for method in Method::DOCUMENTED {
            if !handler.implements(method) {
                continue;
            }
            match normalize(handler.annotation(method), &path, handler.name(), method) {
                Ok(record) => {
                    operations.insert(method.as_str().to_string(), Value::Object(record));
                }
                Err(e) => warn!("omitting {} {} from the document: {}", method, path, e),
            }
        }
        if operations.is_empty() {
            debug!("no documented operations at {}, path omitted", path);
            continue;
        }

        let key = match path_prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}{}", prefix, path),
            _ => path,
        };
        paths.insert(key, operations);
    }

    SwaggerDocument {
        swagger: "2.0".to_string(),
        info: app.info().clone(),
        produces: vec![app.media_type().to_string()],
        paths,
    }
}
