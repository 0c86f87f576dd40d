//! Creation option parsing.
//!
//! # Responsibilities
//! - Seed `header_opts` from every `X-Router-Opt` header
//! - Decode the request body over the seeded value
//! - Default the route to "/" when only a domain was requested
//!
//! # Design Decisions
//! - Body keys use the orchestrator's wire names; unknown keys are kept in
//!   `additional_opts` instead of being rejected
//! - Only an explicit `headerOpts` body key replaces the header values

use serde_json::{Map, Value};
use thiserror::Error;

use crate::provider::options::{
    ACME_CNAME_OPT, ACME_OPT, DOMAIN_OPT, DOMAIN_PREFIX_OPT, DOMAIN_SUFFIX_OPT,
    EXPOSED_PORT_OPT, HEADER_OPTS_KEY, POOL_OPT, ROUTE_OPT,
};
use crate::provider::CreateOpts;

/// Header carrying extra creation options, repeated once per option.
pub const OPTION_HEADER: &str = "X-Router-Opt";

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("error parsing options: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid value for option {key:?}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Merge header-supplied and body-supplied options into one value.
pub fn parse_create_opts(header_opts: Vec<String>, body: &[u8]) -> Result<CreateOpts, OptionsError> {
    let mut opts = CreateOpts {
        header_opts,
        ..Default::default()
    };

    if !body.iter().all(u8::is_ascii_whitespace) {
        let fields: Map<String, Value> = serde_json::from_slice(body)?;
        for (key, value) in fields {
            apply(&mut opts, key, value)?;
        }
    }

    if opts.has_domain() && opts.route.is_empty() {
        opts.route = "/".to_string();
    }
    Ok(opts)
}

fn apply(opts: &mut CreateOpts, key: String, value: Value) -> Result<(), OptionsError> {
    match key.as_str() {
        POOL_OPT => opts.pool = Some(string_value(value)),
        EXPOSED_PORT_OPT => opts.exposed_port = Some(string_value(value)),
        DOMAIN_OPT => opts.domain = Some(string_value(value)),
        ROUTE_OPT => opts.route = string_value(value),
        DOMAIN_SUFFIX_OPT => opts.domain_suffix = Some(string_value(value)),
        DOMAIN_PREFIX_OPT => opts.domain_prefix = Some(string_value(value)),
        ACME_OPT => opts.acme = bool_value(&key, value)?,
        ACME_CNAME_OPT => opts.acme_cname = bool_value(&key, value)?,
        k if k.eq_ignore_ascii_case(HEADER_OPTS_KEY) => opts.header_opts = list_value(&key, value)?,
        _ => {
            opts.additional_opts.insert(key.clone(), string_value(value));
        }
    }
    Ok(())
}

fn string_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn bool_value(key: &str, value: Value) -> Result<bool, OptionsError> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::String(s) if s.is_empty() => Ok(false),
        Value::String(s) => s.parse().map_err(|_| OptionsError::InvalidValue {
            key: key.to_string(),
            reason: format!("{:?} is not a boolean", s),
        }),
        other => Err(OptionsError::InvalidValue {
            key: key.to_string(),
            reason: format!("{} is not a boolean", other),
        }),
    }
}

fn list_value(key: &str, value: Value) -> Result<Vec<String>, OptionsError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.into_iter().map(string_value).collect()),
        other => Err(OptionsError::InvalidValue {
            key: key.to_string(),
            reason: format!("{} is not a list", other),
        }),
    }
}
