//! Request parameter normalization
//!
//! Clients send the same fields either in the query string or as a
//! form-encoded body. Both are folded into one map here; a key present in both
//! takes the body's value.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request};
use axum::http::{header, HeaderMap};
use url::form_urlencoded;

use super::AppError;
use crate::types::{CallKind, CallSetupRequest};

/// Canonical parameter set of one request
#[derive(Debug, Clone, Default)]
pub struct RequestParams(HashMap<String, String>);

impl RequestParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn call_setup(&self) -> CallSetupRequest {
        CallSetupRequest {
            kind: CallKind::from_param(self.get("type")),
            to: self.get("to").map(str::to_string),
            from: self.get("from").map(str::to_string),
            display_name: self.get("name").map(str::to_string),
            record: self.get("record").map(str::to_string),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequest<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(mut params) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if is_form(req.headers()) {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            params.extend(form_urlencoded::parse(&body).into_owned());
        }

        Ok(Self(params))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}
