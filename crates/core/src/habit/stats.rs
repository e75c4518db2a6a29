//! Per-user habit summary statistics.

use serde::Serialize;

use super::Habit;

/// Snapshot of a user's habits. Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HabitStats {
    pub total_habits: usize,
    /// Habits whose completion flag is set. Only meaningful once the reset
    /// sweep has cleared flags from previous periods.
    pub completed_today: usize,
    /// `completed_today / total_habits`, or `0.0` when there are no habits.
    pub completion_rate: f64,
}

/// Summarise a set of habits. Order does not matter.
pub fn compute_stats(habits: &[Habit]) -> HabitStats {
    let total_habits = habits.len();
    let completed_today = habits.iter().filter(|h| h.is_completed).count();
    let completion_rate = if total_habits > 0 {
        completed_today as f64 / total_habits as f64
    } else {
        0.0
    };

    HabitStats {
        total_habits,
        completed_today,
        completion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::HabitTimezone;
    use chrono::{NaiveTime, TimeZone, Utc};

    fn habit(id: i64, completed: bool) -> Habit {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
        Habit {
            id,
            user_id: 1,
            name: format!("habit-{id}"),
            description: None,
            timezone: HabitTimezone::UTC,
            reset_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            is_completed: completed,
            streak: 0,
            last_completed: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_set_has_zero_rate() {
        let stats = compute_stats(&[]);
        assert_eq!(
            stats,
            HabitStats {
                total_habits: 0,
                completed_today: 0,
                completion_rate: 0.0,
            }
        );
    }

    #[test]
    fn counts_completed_habits() {
        let habits = [habit(1, true), habit(2, false), habit(3, true), habit(4, false)];
        let stats = compute_stats(&habits);
        assert_eq!(stats.total_habits, 4);
        assert_eq!(stats.completed_today, 2);
        assert!((stats.completion_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn all_completed_is_rate_one() {
        let habits = [habit(1, true), habit(2, true), habit(3, true)];
        assert!((compute_stats(&habits).completion_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let json = serde_json::to_value(compute_stats(&[habit(1, true)])).unwrap();
        assert_eq!(json["total_habits"], 1);
        assert_eq!(json["completed_today"], 1);
        assert_eq!(json["completion_rate"], 1.0);
    }
}
