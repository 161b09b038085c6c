use chrono::{Datelike, NaiveDate};

/// Recurring calendar event a strategy asks the engine to fire at session
/// end. With `month_carry`, a `month_day` landing on a non-trading day is
/// carried to the month's next session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSchedule {
    pub month_day: u32,
    pub month_carry: bool,
}

impl TimerSchedule {
    /// First trading session of each month.
    pub fn monthly() -> Self {
        Self {
            month_day: 1,
            month_carry: true,
        }
    }

    /// Whether the timer fires on `session`, given the previous session
    /// date. With carry, it fires on the first session at or after
    /// `month_day` in each month; without, only on `month_day` itself.
    pub fn due(&self, prev_session: Option<NaiveDate>, session: NaiveDate) -> bool {
        if !self.month_carry {
            return session.day() == self.month_day;
        }
        if session.day() < self.month_day {
            return false;
        }
        match prev_session {
            None => true,
            Some(prev) => {
                let new_month =
                    (prev.year(), prev.month()) != (session.year(), session.month());
                new_month || prev.day() < self.month_day
            }
        }
    }
}
