//! Annotation attachment for handlers.
//!
//! The original design attached metadata directly onto handler functions at
//! definition time. Rust has no runtime attribute injection, so a handler is a
//! declarative registration record instead: a [`Handler`] pairs a diagnostic
//! name with one entry point per HTTP verb, and each entry point pairs its
//! callback with an optional, separately-declared [`Metadata`] value.
//!
//! Attachment performs no validation. Malformed records are only caught when
//! the document assembler normalizes them.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::app::App;
use crate::http::{Method, Request, Response};

/// Callback invoked when a request is dispatched to an entry point.
pub type HandlerFn = Arc<dyn Fn(&App, &Request, &mut Response) + Send + Sync>;

/// A raw metadata record attached to one verb entry point.
///
/// This is a thin builder over an insertion-ordered JSON object. Recognized
/// keys are `summary`, `tags`, `parameters`, `body`, `response` and
/// `responses`; anything else is passed through verbatim into the normalized
/// record. Parameter and body entries keep their declaration order, which is
/// the order they appear in the assembled document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    fields: Map<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object, e.g. a `serde_json::json!` literal.
    /// Non-object values yield an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn summary(self, text: &str) -> Self {
        self.field("summary", Value::String(text.to_string()))
    }

    pub fn tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.field("tags", Value::Array(tags))
    }

    /// Adds one entry to the `parameters` shorthand map.
    pub fn parameter(mut self, name: &str, spec: Value) -> Self {
        self.shorthand_entry("parameters", name, spec);
        self
    }

    /// Adds one field to the `body` shorthand map.
    pub fn body_field(mut self, name: &str, spec: Value) -> Self {
        self.shorthand_entry("body", name, spec);
        self
    }

    /// The singular `response` shorthand, expanded to `responses["200"]`
    /// during normalization.
    pub fn response(self, spec: Value) -> Self {
        self.field("response", spec)
    }

    /// Adds one status-code entry to the strict `responses` map.
    pub fn responses(mut self, status: &str, spec: Value) -> Self {
        self.shorthand_entry("responses", status, spec);
        self
    }

    /// Free-form passthrough field, copied verbatim into the normalized record.
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn shorthand_entry(&mut self, key: &str, name: &str, spec: Value) {
        let entry = self
            .fields
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = entry {
            map.insert(name.to_string(), spec);
        }
    }
}

pub(crate) struct EntryPoint {
    pub(crate) annotation: Option<Metadata>,
    pub(crate) callback: HandlerFn,
}

/// A handler: one entry point per supported HTTP verb, registered declaratively.
pub struct Handler {
    name: String,
    entry_points: Vec<(Method, EntryPoint)>,
}

impl Handler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_points: Vec::new(),
        }
    }

    /// Registers an entry point with no attached metadata. The assembler will
    /// omit this verb from the document and log the omission.
    pub fn entry<F>(self, method: Method, callback: F) -> Self
    where
        F: Fn(&App, &Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(method, None, Arc::new(callback))
    }

    /// Registers an entry point with its metadata record. The record is stored
    /// as given; shorthand expansion happens at document-build time.
    pub fn documented<F>(self, method: Method, annotation: Metadata, callback: F) -> Self
    where
        F: Fn(&App, &Request, &mut Response) + Send + Sync + 'static,
    {
        self.register(method, Some(annotation), Arc::new(callback))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn implements(&self, method: Method) -> bool {
        self.entry_points.iter().any(|(m, _)| *m == method)
    }

    pub fn annotation(&self, method: Method) -> Option<&Metadata> {
        self.entry_point(method)?.annotation.as_ref()
    }

    pub(crate) fn entry_point(&self, method: Method) -> Option<&EntryPoint> {
        self.entry_points
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, ep)| ep)
    }

    fn register(mut self, method: Method, annotation: Option<Metadata>, callback: HandlerFn) -> Self {
        // Re-registering a verb replaces the earlier entry point.
        self.entry_points.retain(|(m, _)| *m != method);
        self.entry_points.push((method, EntryPoint { annotation, callback }));
        self
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let methods: Vec<&str> = self.entry_points.iter().map(|(m, _)| m.as_str()).collect();
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("methods", &methods)
            .finish()
    }
}
