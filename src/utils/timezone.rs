use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::AppError;

/// Zone used to turn backend timestamps into history dates
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    /// `None`, blank and `local` mean the system zone; `utc`/`z` are shorthands
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let name = value.map(str::trim).unwrap_or_default();
        match name.to_ascii_lowercase().as_str() {
            "" | "local" => Ok(Timezone::Local),
            "utc" | "z" => Ok(Timezone::Named(chrono_tz::UTC)),
            _ => name
                .parse::<Tz>()
                .map(Timezone::Named)
                .map_err(|_| AppError::InvalidTimezone {
                    input: name.to_string(),
                }),
        }
    }

    fn calendar_day(self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Timezone::Local => instant.with_timezone(&Local).date_naive(),
            Timezone::Named(tz) => instant.with_timezone(&tz).date_naive(),
        }
    }

    /// US-style short date (`11/14/2023`), as shown in the history list
    pub(crate) fn display_date(self, instant: DateTime<Utc>) -> String {
        self.calendar_day(instant).format("%-m/%-d/%Y").to_string()
    }
}
