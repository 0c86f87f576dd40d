//! Well-known creation option keys and their global descriptions.

use std::collections::BTreeMap;

pub const POOL_OPT: &str = "tsuru.io/app-pool";
pub const EXPOSED_PORT_OPT: &str = "exposed-port";
pub const DOMAIN_OPT: &str = "domain";
pub const ROUTE_OPT: &str = "route";
pub const DOMAIN_SUFFIX_OPT: &str = "domain-suffix";
pub const DOMAIN_PREFIX_OPT: &str = "domain-prefix";
pub const ACME_OPT: &str = "acme";
pub const ACME_CNAME_OPT: &str = "acme-cname";

/// Body key that replaces the header-supplied options.
pub const HEADER_OPTS_KEY: &str = "headerOpts";

/// Descriptions used when a provider lists an option without describing it.
pub fn described_options() -> BTreeMap<String, String> {
    [
        (
            EXPOSED_PORT_OPT,
            "Port to be exposed by the Load Balancer. Defaults to 80.",
        ),
        (DOMAIN_OPT, "Domain is the domain used in the ingress."),
        (ROUTE_OPT, "Path prefix for the ingress route."),
        (
            DOMAIN_SUFFIX_OPT,
            "Domain suffix used to build the backend host when no domain is set.",
        ),
        (
            DOMAIN_PREFIX_OPT,
            "Domain prefix prepended to the generated backend host.",
        ),
        (
            ACME_OPT,
            "If set to true, requests a certificate for the backend hosts automatically.",
        ),
        (
            ACME_CNAME_OPT,
            "If set to true, also requests certificates for every bound CNAME.",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
