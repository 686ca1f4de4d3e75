/// Resilience patterns for outbound calls
///
/// This library provides:
/// - **Retry**: Exponential backoff with jitter for transient failures, with a
///   caller-supplied predicate that keeps permanent errors from being retried
///
/// # Example: retry only transient errors
///
/// ```rust,no_run
/// use resilience::{with_retry, RetryConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = RetryConfig::default().with_max_retries(2);
///
///     let result = with_retry(config, |e: &String| e.starts_with("503"), || async {
///         // Your HTTP call here
///         Ok::<_, String>(())
///     })
///     .await;
/// }
/// ```

pub mod retry;

pub use retry::{with_retry, RetryConfig, RetryError};
