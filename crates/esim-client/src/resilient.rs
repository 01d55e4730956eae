use crate::Result;
use esim_config::Capability;
use std::future::Future;
use tracing::{debug, warn};

/// The one place the demo/real fallback policy lives.
///
/// `endpoint = None` means the capability is flag-disabled: synthesize
/// without touching the network. With an endpoint, a recoverable failure
/// (network or 5xx) falls back to the synthetic generator; client-class and
/// auth failures propagate unchanged. Both thunks produce the same type, so
/// callers never learn which mode ran.
pub(crate) async fn resilient<T, RFut, SFut>(
    capability: Capability,
    endpoint: Option<String>,
    real: impl FnOnce(String) -> RFut,
    synthetic: impl FnOnce() -> SFut,
) -> Result<T>
where
    RFut: Future<Output = Result<T>>,
    SFut: Future<Output = Result<T>>,
{
    let Some(base) = endpoint else {
        debug!(?capability, "capability disabled, synthesizing locally");
        return synthetic().await;
    };

    match real(base).await {
        Ok(value) => Ok(value),
        Err(e) if e.is_recoverable() => {
            warn!(?capability, error = %e, "backend unavailable, falling back to synthetic result");
            synthetic().await
        }
        Err(e) => Err(e),
    }
}
