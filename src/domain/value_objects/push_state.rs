//! Per-invocation push counter
//!
//! `push_number` is the only authority on whether a push is the first one of
//! a `push` invocation; watch mode bumps it after every successful push.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushState {
    /// Invocation start, seconds precision UTC (`2024-01-02T03:04:05Z`)
    push_start: String,
    /// 1-based number of the next push
    push_number: u32,
}

impl PushState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            push_start: started_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            push_number: 1,
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn push_start(&self) -> &str {
        &self.push_start
    }

    pub fn push_number(&self) -> u32 {
        self.push_number
    }

    pub fn is_first_push(&self) -> bool {
        self.push_number == 1
    }

    /// `<push_start>.<push_number>`, only defined while watching
    pub fn push_id(&self, watching: bool) -> Option<String> {
        watching.then(|| format!("{}.{}", self.push_start, self.push_number))
    }

    pub(crate) fn advance(&mut self) {
        self.push_number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn state() -> PushState {
        PushState::new(Utc.with_ymd_and_hms(2024, 7, 2, 0, 37, 22).unwrap())
    }

    #[test]
    fn push_start_has_seconds_precision() {
        assert_eq!(state().push_start(), "2024-07-02T00:37:22Z");
    }

    #[test]
    fn push_id_only_when_watching() {
        let state = state();
        assert_eq!(state.push_id(false), None);
        assert_eq!(
            state.push_id(true).as_deref(),
            Some("2024-07-02T00:37:22Z.1")
        );
    }

    #[test]
    fn advance_moves_past_first_push() {
        let mut state = state();
        assert!(state.is_first_push());
        state.advance();
        assert!(!state.is_first_push());
        assert_eq!(state.push_id(true).as_deref(), Some("2024-07-02T00:37:22Z.2"));
    }
}
