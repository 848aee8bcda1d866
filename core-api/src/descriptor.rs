//! Request descriptors
//!
//! A [`RequestDescriptor`] is the complete, immutable description of one call.
//! Interceptors take it by value and hand back either the same descriptor or
//! a new one built with the `with_*`/`query` methods below.

use bridge_traits::http::HttpMethod;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{ApiError, Result};

/// Expected shape of a successful response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Decode the body as JSON
    #[default]
    Json,
    /// Hand the raw bytes back untouched
    Binary,
}

/// One outbound API call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    headers: HashMap<String, String>,
    show_loading: bool,
    response_type: ResponseType,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HashMap::new(),
            show_loading: true,
            response_type: ResponseType::Json,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append one query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append every present field of a serializable struct as query parameters.
    ///
    /// `null` fields are skipped, strings are used verbatim and other scalars
    /// use their JSON rendering (`true`, `100`). Nested values are rejected.
    pub fn query_from<T: Serialize>(mut self, params: &T) -> Result<Self> {
        let value = serde_json::to_value(params)
            .map_err(|e| ApiError::InvalidRequest(format!("query parameters: {}", e)))?;

        let Value::Object(fields) = value else {
            return Err(ApiError::InvalidRequest(
                "query parameters must serialize to an object".to_string(),
            ));
        };

        for (key, value) in fields {
            match value {
                Value::Null => {}
                Value::String(text) => self.query.push((key, text)),
                Value::Bool(_) | Value::Number(_) => self.query.push((key, value.to_string())),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ApiError::InvalidRequest(format!(
                        "query parameter '{}' is not a scalar",
                        key
                    )))
                }
            }
        }

        Ok(self)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Suppress (or re-enable) the loading overlay for this call.
    pub fn with_loading(mut self, show_loading: bool) -> Self {
        self.show_loading = show_loading;
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn show_loading(&self) -> bool {
        self.show_loading
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    /// Absolute URL of this call relative to `base`.
    ///
    /// The base's trailing slash and the path's leading slash are merged so
    /// exactly one separator remains; a trailing slash on the path is kept.
    pub fn url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');

        let mut url = format!("{}/{}", base, path);

        if !self.query.is_empty() {
            let encoded: Vec<String> = self
                .query
                .iter()
                .map(|(key, value)| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
                })
                .collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }

        url
    }
}

/// Percent-encode a caller-supplied path segment.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
