//! Concurrent preset resolution
//!
//! A job references its presets by canonical name; each adapter needs the
//! provider-side preset before it can assemble outputs. Lookups run
//! concurrently, one task per distinct preset ID, and report into a single
//! channel. The first failure cancels the remaining lookups.

use reelcast_core::models::Job;
use reelcast_core::{ErrorKind, ProviderError, ProviderResult};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Provider preset ID for every output of `job`, in output order.
///
/// Fails before any remote call when the job has no outputs or when an
/// output's preset map has no entry for `provider`.
pub fn provider_preset_ids(job: &Job, provider: &str) -> ProviderResult<Vec<String>> {
    if job.outputs.is_empty() {
        return Err(ProviderError::invalid_field(
            "outputs",
            "[]",
            "at least one output",
        ));
    }

    job.outputs
        .iter()
        .map(|output| {
            output
                .preset
                .provider_preset(provider)
                .map(str::to_string)
                .ok_or_else(|| ProviderError::PresetMapNotFound {
                    preset: output.preset.name.clone(),
                    provider: provider.to_string(),
                })
        })
        .collect()
}

/// Fetch every distinct preset in `ids` concurrently.
///
/// `fetch` builds the lookup future for one ID; it is expected to tag its own
/// errors with the preset ID. On the first error the shared token is
/// cancelled, outstanding lookups resolve as [`ProviderError::Cancelled`] and
/// the first error is returned. Later errors are logged and dropped.
pub async fn resolve_presets<I, T, F, Fut>(ids: I, fetch: F) -> ProviderResult<HashMap<String, T>>
where
    I: IntoIterator<Item = String>,
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = ProviderResult<T>> + Send + 'static,
{
    let ids: BTreeSet<String> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    tracing::debug!(count = ids.len(), "Resolving provider presets");

    let token = CancellationToken::new();
    let (tx, mut rx) = mpsc::channel(ids.len());

    for id in &ids {
        let lookup = fetch(id.clone());
        let tx = tx.clone();
        let token = token.clone();
        let id = id.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => {
                    Err(ProviderError::Cancelled(format!("fetching preset {}", id)))
                }
                result = lookup => result,
            };
            // Receiver only goes away once every sender has reported.
            let _ = tx.send((id, result)).await;
        });
    }
    drop(tx);

    let mut resolved = HashMap::with_capacity(ids.len());
    let mut first_error: Option<ProviderError> = None;

    while let Some((id, result)) = rx.recv().await {
        match result {
            Ok(preset) => {
                if first_error.is_none() {
                    resolved.insert(id, preset);
                }
            }
            Err(err) if first_error.is_none() => {
                token.cancel();
                first_error = Some(err);
            }
            Err(err) if err.kind() == ErrorKind::Cancelled => {
                tracing::debug!(preset_id = %id, "Preset lookup cancelled");
            }
            Err(err) => {
                tracing::warn!(
                    preset_id = %id,
                    error = %err,
                    "Discarding preset lookup error after earlier failure"
                );
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(resolved),
    }
}
