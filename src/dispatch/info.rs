//! Option introspection.

use std::collections::BTreeMap;

use crate::dispatch::Dispatcher;
use crate::error::ApiResult;
use crate::provider::options::described_options;

/// Describe every option the provider supports.
///
/// Empty provider descriptions fall back to `defaults`; options the provider
/// does not list are left out even when a default description exists.
pub fn merge_option_descriptions(
    supported: BTreeMap<String, String>,
    defaults: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    supported
        .into_iter()
        .map(|(key, description)| {
            let description = if description.is_empty() {
                defaults.get(&key).cloned().unwrap_or_default()
            } else {
                description
            };
            (key, description)
        })
        .collect()
}

impl Dispatcher {
    pub fn info(&self, mode: &str) -> ApiResult<BTreeMap<String, String>> {
        let result = self.registry.resolve(mode).map(|entry| {
            merge_option_descriptions(entry.provider().supported_options(), &described_options())
        });
        self.finish("info", mode, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testing::{dispatcher, RecordingProvider};
    use crate::provider::options::DOMAIN_OPT;
    use std::sync::Arc;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn provider_descriptions_win_and_gaps_use_defaults() {
        let merged = merge_option_descriptions(
            map(&[("opt1", ""), ("opt2", "custom")]),
            &map(&[("opt1", "default1"), ("opt3", "default3")]),
        );
        assert_eq!(merged, map(&[("opt1", "default1"), ("opt2", "custom")]));
    }

    #[test]
    fn unknown_option_without_default_stays_empty() {
        let merged = merge_option_descriptions(map(&[("opt9", "")]), &BTreeMap::new());
        assert_eq!(merged, map(&[("opt9", "")]));
    }

    #[test]
    fn info_uses_global_descriptions() {
        let provider = RecordingProvider::default().with_options(map(&[(DOMAIN_OPT, "")]));
        let dispatcher = dispatcher(Arc::new(provider));

        let info = dispatcher.info("").unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info[DOMAIN_OPT], described_options()[DOMAIN_OPT]);
    }
}
