//! Date column parsing.

use capsort_primitives::Date;
use polars::prelude::*;

use crate::UtilsError;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

/// Convert days since the Unix epoch (polars `Date` physical value).
#[must_use]
pub fn date_from_epoch_days(days: i32) -> Option<Date> {
    days.checked_add(UNIX_EPOCH_CE_DAYS).and_then(Date::from_num_days_from_ce_opt)
}

/// Convert an integer `YYYYMMDD` date (the CRSP `date` convention).
#[must_use]
pub fn date_from_yyyymmdd(value: i64) -> Option<Date> {
    let year = i32::try_from(value / 10_000).ok()?;
    let month = u32::try_from((value / 100) % 100).ok()?;
    let day = u32::try_from(value % 100).ok()?;
    Date::from_ymd_opt(year, month, day)
}

/// Parse a date string in `YYYYMMDD`, `YYYY-MM-DD` or `YYYY/MM/DD` form.
#[must_use]
pub fn parse_date(s: &str) -> Option<Date> {
    let s = s.trim();
    ["%Y%m%d", "%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| Date::parse_from_str(s, fmt).ok())
}

/// Parse a date column into calendar dates.
///
/// Accepts polars `Date` and `Datetime` columns, integer `YYYYMMDD` columns
/// and string columns. Unparsable cells become `None`.
///
/// # Errors
/// Returns `UtilsError::UnsupportedType` for any other column type.
pub fn parse_date_column(column: &Column) -> Result<Vec<Option<Date>>, UtilsError> {
    match column.dtype() {
        DataType::Date => epoch_days(column),
        DataType::Datetime(_, _) => epoch_days(&column.cast(&DataType::Date)?),
        DataType::String => {
            Ok(column.str()?.into_iter().map(|s| s.and_then(parse_date)).collect())
        }
        dtype if dtype.is_integer() => {
            let values = column.cast(&DataType::Int64)?;
            Ok(values.i64()?.into_iter().map(|v| v.and_then(date_from_yyyymmdd)).collect())
        }
        dtype => Err(UtilsError::UnsupportedType {
            column: column.name().to_string(),
            dtype: dtype.to_string(),
        }),
    }
}

fn epoch_days(column: &Column) -> Result<Vec<Option<Date>>, UtilsError> {
    let days = column.cast(&DataType::Int32)?;
    Ok(days.i32()?.into_iter().map(|d| d.and_then(date_from_epoch_days)).collect())
}
