//! Swap coordination.

use crate::dispatch::Dispatcher;
use crate::error::{ApiError, ApiResult};
use crate::provider::InstanceId;

impl Dispatcher {
    /// Exchange the serving identity of `src` with the backend of `target`
    /// that carries the same instance qualifier. Atomicity is the provider's.
    pub async fn swap(&self, mode: &str, src: &InstanceId, target: &str) -> ApiResult<()> {
        self.observe("swap", mode, async {
            if target.is_empty() {
                return Err(ApiError::BadRequest("empty target".into()));
            }
            let entry = self.registry.resolve(mode)?;
            let dst = src.with_app(target);
            tracing::info!(src = %src, dst = %dst, mode = entry.mode(), "Swapping backends");
            self.bounded(entry.provider().swap(src, &dst)).await?;
            Ok(())
        })
        .await
    }
}
