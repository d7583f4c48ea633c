use chrono::{Datelike, Duration, NaiveDate};

use crate::models::string_enum;

string_enum! {
    /// Quick date filters offered by the table views
    pub enum DatePreset {
        Today => "today",
        Yesterday => "yesterday",
        Last7Days => "last7Days",
        ThisMonth => "thisMonth",
        LastMonth => "lastMonth",
        ThisYear => "thisYear",
        Custom => "custom",
    }
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Turn query parameters into a range relative to `today`.
    ///
    /// A non-custom preset wins over `from`/`to`. Without a preset (or with
    /// `custom`) the explicit bounds are used and either may be open.
    /// Returns `Ok(None)` when nothing constrains the dates.
    pub fn resolve(
        preset: Option<DatePreset>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Option<DateRange>, String> {
        let range = match preset {
            Some(DatePreset::Today) => Some(Self::day(today)),
            Some(DatePreset::Yesterday) => Some(Self::day(today - Duration::days(1))),
            Some(DatePreset::Last7Days) => Some(DateRange {
                start: today - Duration::days(6),
                end: today,
            }),
            Some(DatePreset::ThisMonth) => Some(Self::month_of(today)),
            Some(DatePreset::LastMonth) => Some(Self::month_of(first_of_month(today) - Duration::days(1))),
            Some(DatePreset::ThisYear) => Some(Self::year_of(today)),
            Some(DatePreset::Custom) | None => match (from, to) {
                (None, None) => None,
                (from, to) => Some(DateRange {
                    start: from.unwrap_or(NaiveDate::MIN),
                    end: to.unwrap_or(NaiveDate::MAX),
                }),
            },
        };

        if let Some(range) = range {
            if range.start > range.end {
                return Err(format!(
                    "Invalid date range: {} is after {}",
                    range.start, range.end
                ));
            }
        }
        Ok(range)
    }

    pub fn day(date: NaiveDate) -> Self {
        DateRange { start: date, end: date }
    }

    pub fn month_of(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month.map(|d| d - Duration::days(1)).unwrap_or(NaiveDate::MAX);
        DateRange { start, end }
    }

    pub fn year_of(date: NaiveDate) -> Self {
        DateRange {
            start: NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
            end: NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
