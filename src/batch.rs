use crate::engine::{DetectionEngine, PredictionResult, RawInput};
use std::sync::Arc;
use tokio::task::JoinError;

/// URLs from a list file, one per line. Blank lines and `#` comments are
/// skipped.
pub fn parse_url_list(text: &str) -> Vec<RawInput> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| RawInput::Url(line.to_string()))
        .collect()
}

/// Scan every input on the blocking pool. Results come back in input order.
pub async fn scan_all(
    engine: Arc<DetectionEngine>,
    inputs: Vec<RawInput>,
) -> Result<Vec<PredictionResult>, JoinError> {
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|input| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || engine.scan(&input))
        })
        .collect();

    log::debug!("Scanning {} inputs", handles.len());

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    Ok(results)
}
