// cooldown.rs - Per-user, per-command invocation gate
//
// Entries are evicted lazily: an expired entry is only removed the next time
// that exact (user, command) pair is checked. When a user's last entry goes,
// the per-user map goes with it so idle users cost nothing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownCheck {
    Allowed,
    Denied { remaining_ms: u64 },
}

struct CooldownEntry {
    issued_at: Instant,
    duration: Duration,
}

#[derive(Default)]
pub struct CooldownTracker {
    // user id -> command name -> active entry
    entries: HashMap<u64, HashMap<String, CooldownEntry>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `user_id` may run `command_name` now, recording a fresh
    /// entry when allowed. Check-and-record happens under one `&mut self`
    /// borrow, so callers holding the tracker lock cannot interleave.
    pub fn check(&mut self, user_id: u64, command_name: &str, duration_secs: u64) -> CooldownCheck {
        self.check_at(Instant::now(), user_id, command_name, duration_secs)
    }

    fn check_at(
        &mut self,
        now: Instant,
        user_id: u64,
        command_name: &str,
        duration_secs: u64,
    ) -> CooldownCheck {
        // zero-cooldown commands are ungated and leave no entry behind
        if duration_secs == 0 {
            return CooldownCheck::Allowed;
        }

        if let Some(per_user) = self.entries.get_mut(&user_id) {
            if let Some(entry) = per_user.get(command_name) {
                let elapsed = now.saturating_duration_since(entry.issued_at);
                if elapsed < entry.duration {
                    // still on cooldown
                    let remaining = entry.duration - elapsed;
                    return CooldownCheck::Denied {
                        remaining_ms: remaining.as_millis() as u64,
                    };
                }
                per_user.remove(command_name);
            }
            if per_user.is_empty() {
                self.entries.remove(&user_id);
            }
        }

        self.entries.entry(user_id).or_default().insert(
            command_name.to_string(),
            CooldownEntry {
                issued_at: now,
                duration: Duration::from_secs(duration_secs),
            },
        );
        CooldownCheck::Allowed
    }

    #[cfg(test)]
    fn tracked_users(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cooldown_is_always_allowed() {
        let mut tracker = CooldownTracker::new();
        for _ in 0..5 {
            assert_eq!(tracker.check(1, "ping", 0), CooldownCheck::Allowed);
        }
        assert_eq!(tracker.tracked_users(), 0);
    }

    #[test]
    fn second_invocation_within_window_is_denied() {
        let mut tracker = CooldownTracker::new();
        let t0 = Instant::now();

        assert_eq!(tracker.check_at(t0, 1, "ping", 10), CooldownCheck::Allowed);

        let t1 = t0 + Duration::from_secs(3);
        match tracker.check_at(t1, 1, "ping", 10) {
            CooldownCheck::Denied { remaining_ms } => assert_eq!(remaining_ms, 7_000),
            CooldownCheck::Allowed => panic!("expected denial inside the window"),
        }

        // remaining time shrinks as time passes
        let t2 = t0 + Duration::from_secs(6);
        match tracker.check_at(t2, 1, "ping", 10) {
            CooldownCheck::Denied { remaining_ms } => assert_eq!(remaining_ms, 4_000),
            CooldownCheck::Allowed => panic!("expected denial inside the window"),
        }
    }

    #[test]
    fn allowed_again_after_window_elapses() {
        let mut tracker = CooldownTracker::new();
        let t0 = Instant::now();

        assert_eq!(tracker.check_at(t0, 1, "ping", 10), CooldownCheck::Allowed);

        let t1 = t0 + Duration::from_secs(11);
        assert_eq!(tracker.check_at(t1, 1, "ping", 10), CooldownCheck::Allowed);
    }

    #[test]
    fn users_are_independent() {
        let mut tracker = CooldownTracker::new();
        let t0 = Instant::now();

        assert_eq!(tracker.check_at(t0, 1, "ping", 10), CooldownCheck::Allowed);
        assert_eq!(tracker.check_at(t0, 2, "ping", 10), CooldownCheck::Allowed);
    }

    #[test]
    fn commands_are_independent() {
        let mut tracker = CooldownTracker::new();
        let t0 = Instant::now();

        assert_eq!(tracker.check_at(t0, 1, "ping", 10), CooldownCheck::Allowed);
        assert_eq!(tracker.check_at(t0, 1, "help", 10), CooldownCheck::Allowed);
    }

    #[test]
    fn expired_entries_are_evicted_on_next_check() {
        let mut tracker = CooldownTracker::new();
        let t0 = Instant::now();

        tracker.check_at(t0, 1, "ping", 5);
        assert_eq!(tracker.tracked_users(), 1);

        // a different command after expiry re-records for that command only;
        // the stale ping entry stays until its own key is checked
        let t1 = t0 + Duration::from_secs(6);
        tracker.check_at(t1, 1, "ping", 5);
        assert_eq!(tracker.tracked_users(), 1);
    }

    #[test]
    fn empty_user_maps_are_dropped() {
        let mut tracker = CooldownTracker::new();
        let t0 = Instant::now();

        tracker.check_at(t0, 1, "ping", 5);
        assert_eq!(tracker.tracked_users(), 1);

        // after expiry the re-check replaces the entry; the user stays tracked
        let t1 = t0 + Duration::from_secs(10);
        tracker.check_at(t1, 1, "ping", 5);
        assert_eq!(tracker.tracked_users(), 1);
    }
}
