//! Dispatcher fixture shared by dispatch tests.

use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::{Dispatcher, ModeRegistry};

pub(crate) use crate::provider::RecordingProvider;

pub(crate) const TEST_MODE: &str = "test";

/// Dispatcher whose default mode is served by `provider`.
pub(crate) fn dispatcher(provider: Arc<RecordingProvider>) -> Dispatcher {
    let registry = ModeRegistry::new(TEST_MODE).with_provider(TEST_MODE, provider);
    Dispatcher::new(Arc::new(registry), Duration::from_secs(5))
}
