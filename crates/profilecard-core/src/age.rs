//! Calendar age ("uptime") since a fixed date
//!
//! Produces strings like `21 years, 9 months, 6 days`, with a cake appended on the exact
//! anniversary day.

use crate::error::CoreError;
use chrono::{Datelike, Months, NaiveDate};
use std::fmt;

/// Marker appended when months and days are both zero
pub const ANNIVERSARY_MARKER: &str = "🎂";

/// Calendar difference between two dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Age {
    /// Whole years, months and days from `birth` to `today`.
    ///
    /// Month arithmetic clamps to the end of shorter months, so Jan 31 + 1 month is the last
    /// day of February.
    pub fn between(birth: NaiveDate, today: NaiveDate) -> Result<Self, CoreError> {
        if birth > today {
            return Err(CoreError::InvalidDate {
                message: format!("{} is after {}", birth, today),
            });
        }

        let mut total_months = (today.year() - birth.year()) * 12
            + (today.month() as i32 - birth.month() as i32);
        let mut anchor = add_months(birth, total_months)?;
        if anchor > today {
            total_months -= 1;
            anchor = add_months(birth, total_months)?;
        }

        let days = (today - anchor).num_days();

        Ok(Self {
            years: (total_months / 12) as u32,
            months: (total_months % 12) as u32,
            days: days as u32,
        })
    }

    pub fn is_anniversary(&self) -> bool {
        self.months == 0 && self.days == 0
    }
}

fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, CoreError> {
    let months = u32::try_from(months).map_err(|_| CoreError::InvalidDate {
        message: format!("negative month offset {}", months),
    })?;
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| CoreError::InvalidDate {
            message: format!("{} + {} months is out of range", date, months),
        })
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year{}, {} month{}, {} day{}",
            self.years,
            plural(self.years),
            self.months,
            plural(self.months),
            self.days,
            plural(self.days)
        )?;
        if self.is_anniversary() {
            write!(f, " {}", ANNIVERSARY_MARKER)?;
        }
        Ok(())
    }
}

/// Formatted age string from `birth` to `today`
pub fn format_age(birth: NaiveDate, today: NaiveDate) -> Result<String, CoreError> {
    Age::between(birth, today).map(|age| age.to_string())
}
