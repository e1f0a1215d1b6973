use std::time::Duration;

/// Suspend the caller for `delay`.
///
/// In the browser this yields to the event loop through `setTimeout`. Native
/// builds only exist for tests, where blocking the test thread is fine.
pub(crate) async fn sleep(delay: Duration) {
    if delay.is_zero() {
        return;
    }

    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(delay).await;

    #[cfg(not(target_arch = "wasm32"))]
    std::thread::sleep(delay);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_zero_returns_immediately() {
        futures::executor::block_on(sleep(Duration::ZERO));
    }

    #[test]
    fn test_sleep_waits_at_least_delay() {
        let start = std::time::Instant::now();
        futures::executor::block_on(sleep(Duration::from_millis(5)));
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
