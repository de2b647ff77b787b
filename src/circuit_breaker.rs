use failsafe::{backoff, failure_policy, Config, StateMachine};
use std::time::Duration;

/// Circuit breaker guarding the completion provider.
pub type InsightsCircuitBreaker =
    StateMachine<failure_policy::ConsecutiveFailures<backoff::Exponential>, ()>;

/// Creates a circuit breaker for completion-provider calls.
///
/// # Configuration
///
/// - **Failure threshold**: `failure_threshold` consecutive failures triggers OPEN state.
/// - **Backoff**: Exponential backoff from 10s to 60s before attempting recovery.
///
/// # States
///
/// - **CLOSED**: Normal operation, requests pass through.
/// - **OPEN**: Too many failures, requests fail fast and the caller falls back.
/// - **HALF_OPEN**: Testing if the provider recovered.
///
/// The breaker never retries a call. A rejected call is treated like any
/// other provider failure.
pub fn create_insights_circuit_breaker(failure_threshold: u32) -> InsightsCircuitBreaker {
    let backoff_strategy = backoff::exponential(
        Duration::from_secs(10), // Initial delay
        Duration::from_secs(60), // Maximum delay
    );

    let failure_policy = failure_policy::consecutive_failures(failure_threshold, backoff_strategy);

    Config::new().failure_policy(failure_policy).build()
}
