//! Request extractors shared by every handler.

use axum::{
    extract::{rejection::RawPathParamsRejection, FromRequestParts, RawPathParams},
    http::request::Parts,
    response::{IntoResponse, Response},
};

use crate::dispatch::{resolve_instance, INSTANCE_HEADER};
use crate::provider::InstanceId;

/// Path parameters of the routing API. Absent ones are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    /// Empty when the route was reached through the default-mode prefix.
    pub mode: String,
    pub name: String,
    pub certname: String,
    pub cname: String,
}

impl<S> FromRequestParts<S> for RouteParams
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = match RawPathParams::from_request_parts(parts, state).await {
            Ok(raw) => raw,
            Err(RawPathParamsRejection::MissingPathParams(_)) => return Ok(Self::default()),
            Err(rejection) => return Err(rejection.into_response()),
        };

        let mut params = Self::default();
        for (key, value) in &raw {
            let slot = match key {
                "mode" => &mut params.mode,
                "name" => &mut params.name,
                "certname" => &mut params.certname,
                "cname" => &mut params.cname,
                _ => continue,
            };
            *slot = value.to_string();
        }
        Ok(params)
    }
}

/// The backend a request addresses, plus the mode serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub params: RouteParams,
    pub id: InstanceId,
}

impl Target {
    pub fn mode(&self) -> &str {
        &self.params.mode
    }
}

impl<S> FromRequestParts<S> for Target
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RouteParams::from_request_parts(parts, state).await?;
        let instance = parts
            .headers
            .get(INSTANCE_HEADER)
            .and_then(|v| v.to_str().ok());
        let id = resolve_instance(&params.name, instance);
        Ok(Self { params, id })
    }
}
