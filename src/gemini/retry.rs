// Retry policy for Gemini generation.
// Backoff schedule for overload responses and token budgets for truncated output.

use std::time::Duration;

/// Controls the bounded retry loop around a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delays before each retry of an overloaded (503) model, in order.
    pub backoff: Vec<Duration>,
    /// Output token budget of the first attempt.
    pub initial_tokens: u32,
    /// Budget used for the single retry after a MAX_TOKENS truncation.
    pub extended_tokens: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(Duration::from_secs(1), 3)
    }
}

impl RetryPolicy {
    /// `retries` delays doubling from `base`.
    pub fn exponential(base: Duration, retries: u32) -> Self {
        let backoff = (0..retries)
            .map(|attempt| base.saturating_mul(2u32.saturating_pow(attempt)))
            .collect();
        Self {
            backoff,
            initial_tokens: 3500,
            extended_tokens: 4500,
        }
    }
}

/// Keep whichever of the current best and the candidate text is longer.
pub(crate) fn keep_longest(best: &mut Option<String>, candidate: String) {
    let longer = match best {
        Some(current) => candidate.chars().count() > current.chars().count(),
        None => !candidate.is_empty(),
    };
    if longer {
        *best = Some(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.backoff,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
        assert_eq!(policy.initial_tokens, 3500);
        assert_eq!(policy.extended_tokens, 4500);
    }

    #[test]
    fn test_keep_longest() {
        let mut best = None;
        keep_longest(&mut best, String::new());
        assert_eq!(best, None);

        keep_longest(&mut best, "short".to_string());
        keep_longest(&mut best, "a longer text".to_string());
        keep_longest(&mut best, "mid".to_string());
        assert_eq!(best.as_deref(), Some("a longer text"));
    }
}
