use chrono::{Datelike, NaiveDate};

use crate::enums::PatientSex;
use crate::metadata::DicomMetadata;

/// Patient demographics read from a file's metadata.
///
/// Absent fields fall back to `0` / [`PatientSex::Unknown`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PatientStatistics {
    /// Completed years at the evaluation date
    pub age: u32,
    pub sex: PatientSex,
    /// Patient's Weight, in kilograms
    pub weight: f64,
    /// Patient's Size, in meters
    pub height: f64,
}

impl PatientStatistics {
    pub fn from_metadata(metadata: &DicomMetadata, today: NaiveDate) -> Self {
        let age = metadata
            .patient_birth_date()
            .map(|birth_date| completed_years(birth_date, today))
            .unwrap_or(0);

        Self {
            age,
            sex: metadata.patient_sex().unwrap_or_default(),
            weight: metadata.patient_weight().unwrap_or(0.0),
            height: metadata.patient_size().unwrap_or(0.0),
        }
    }
}

impl From<PatientStatistics> for (f64, PatientSex, f64, f64) {
    fn from(stats: PatientStatistics) -> Self {
        (stats.age as f64, stats.sex, stats.weight, stats.height)
    }
}

/// Number of birthdays reached by `today`. Zero for dates before birth.
pub fn completed_years(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    let before_birthday = (today.month(), today.day()) < (birth_date.month(), birth_date.day());
    let years = today.year() - birth_date.year() - i32::from(before_birthday);
    years.max(0) as u32
}

/// Parse a DA value (`YYYYMMDD`).
pub(crate) fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").ok()
}
