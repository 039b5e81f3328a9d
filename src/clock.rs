//! Time source abstraction
//!
//! Transactions are stamped with "today" and the motivational message rotates
//! per calendar day, so the session reads the date through [`Clock`] instead
//! of calling `Local::now()` directly.

use std::sync::{Arc, Mutex};

use chrono::{Days, Local, NaiveDate};

use crate::error::{FinanceError, FinanceResult};

pub trait Clock: Send + Sync {
    /// The current local calendar date
    fn today(&self) -> NaiveDate;
}

/// Real-time clock backed by the local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same date, so a test can keep one handle and advance the
/// clock used by a session.
#[derive(Debug, Clone)]
pub struct ManualClock {
    today: Arc<Mutex<NaiveDate>>,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Arc::new(Mutex::new(today)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        let mut guard = self.today.lock().unwrap_or_else(|e| e.into_inner());
        *guard = date;
    }

    /// Move forward by `days` calendar days
    ///
    /// Fails without moving when the result is past the last representable date.
    pub fn advance_days(&self, days: u64) -> FinanceResult<NaiveDate> {
        let mut guard = self.today.lock().unwrap_or_else(|e| e.into_inner());
        let next = guard.checked_add_days(Days::new(days)).ok_or_else(|| {
            FinanceError::Validation(format!("Cannot advance {} day(s) past {}", days, *guard))
        })?;
        *guard = next;
        Ok(next)
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(|e| e.into_inner())
    }
}
