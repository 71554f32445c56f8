//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::{HttpError, HttpMethod, HttpResponseError, Params, Transport};
use crate::rest::resources::lite::{associations, url_builder};
use crate::rest::Api;

/// A request the transport received.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Call {
    pub method: HttpMethod,
    pub path: String,
    pub params: Params,
}

/// Answers requests keyed by `"<METHOD> <path>"` and records every call.
///
/// Unscripted requests fail with a 404.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: HashMap<String, Value>,
    raw: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, key: &str, body: Value) -> Self {
        self.responses.insert(key.to_string(), body);
        self
    }

    pub(crate) fn respond_raw(mut self, key: &str, body: &[u8]) -> Self {
        self.raw.insert(key.to_string(), body.to_vec());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    fn record(&self, method: HttpMethod, path: &str, params: &Params) -> String {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call {
                method,
                path: path.to_string(),
                params: params.clone(),
            });
        format!("{} {path}", method.as_str())
    }
}

fn not_found(key: &str) -> HttpError {
    HttpError::Response(HttpResponseError {
        code: 404,
        message: format!("no scripted response for {key}"),
    })
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> Result<Option<Value>, HttpError> {
        let key = self.record(method, path, params);
        self.responses
            .get(&key)
            .cloned()
            .map(Some)
            .ok_or_else(|| not_found(&key))
    }

    async fn raw_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
    ) -> Result<Vec<u8>, HttpError> {
        let key = self.record(method, path, params);
        self.raw.get(&key).cloned().ok_or_else(|| not_found(&key))
    }
}

/// Builds an [`Api`] over `transport` with the Lite registries.
pub(crate) fn api_with(transport: ScriptedTransport) -> (Api, Arc<ScriptedTransport>) {
    let transport = Arc::new(transport);
    let api = Api::new(transport.clone(), associations(), url_builder());
    (api, transport)
}

/// Unwraps a JSON object literal into a parameter map.
pub(crate) fn object(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
