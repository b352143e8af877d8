use std::time::Duration;

use futures_timer::Delay;
use serde::Serialize;

/// How long a simulated request takes unless a caller asks otherwise.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);

/// Resolves to `result` after `delay` and logs it as pretty JSON, standing in
/// for a round trip to a server.
pub async fn fake_request<T: Serialize>(result: T, delay: Duration) -> T {
    Delay::new(delay).await;
    match serde_json::to_string_pretty(&result) {
        Ok(json) => tracing::info!(result = %json, "request finished"),
        Err(error) => tracing::warn!(%error, "request result is not serializable"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn echoes_the_result() {
        let result = block_on(fake_request(json!({ "ok": true }), Duration::from_millis(1)));
        assert_eq!(result, json!({ "ok": true }));
    }
}
