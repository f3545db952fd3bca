use chrono::{FixedOffset, NaiveDate, Utc};
use service_core::error::AppError;

/// Source of "today" for invoice dates, numbering years and the
/// customer detail window.
#[derive(Debug, Clone, Copy)]
pub enum BusinessClock {
    /// Wall clock shifted to the business's UTC offset.
    Offset(FixedOffset),
    /// Always the same day.
    Pinned(NaiveDate),
}

impl BusinessClock {
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, AppError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(BusinessClock::Offset)
            .ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "UTC offset of {} minutes is out of range",
                    minutes
                ))
            })
    }

    pub fn today(&self) -> NaiveDate {
        match self {
            BusinessClock::Offset(offset) => Utc::now().with_timezone(offset).date_naive(),
            BusinessClock::Pinned(date) => *date,
        }
    }
}
