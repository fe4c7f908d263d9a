// src/report/types.rs

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// The three daily summaries published by the health department.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum ReportType {
    Confirmed,
    Deaths,
    Hospitalizations,
}

impl ReportType {
    pub const ALL: [ReportType; 3] = [
        ReportType::Confirmed,
        ReportType::Deaths,
        ReportType::Hospitalizations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Confirmed => "confirmed",
            ReportType::Deaths => "deaths",
            ReportType::Hospitalizations => "hospitalizations",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Some(ReportType::Confirmed),
            "deaths" => Some(ReportType::Deaths),
            "hospitalizations" => Some(ReportType::Hospitalizations),
            _ => None,
        }
    }

    /// Prefix used in remote document names and cache files.
    /// Confirmed-case reports carry no prefix.
    pub fn file_prefix(&self) -> String {
        match self {
            ReportType::Confirmed => String::new(),
            other => format!("{}-", other.as_str()),
        }
    }

    /// First day the report was published.
    pub fn first_published(&self) -> NaiveDate {
        let (y, m, d) = match self {
            ReportType::Confirmed => (2020, 3, 17),
            ReportType::Deaths => (2020, 3, 22),
            ReportType::Hospitalizations => (2020, 3, 24),
        };
        NaiveDate::from_ymd_opt(y, m, d).expect("static start date is valid")
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication slot within a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    Morning,
    Evening,
}

impl Part {
    pub const BOTH: [Part; 2] = [Part::Morning, Part::Evening];

    pub fn number(&self) -> u8 {
        match self {
            Part::Morning => 1,
            Part::Evening => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Part::Morning),
            2 => Some(Part::Evening),
            _ => None,
        }
    }

    /// Hour of day attached to rows from this slot in the assembled series.
    pub fn hour(&self) -> u32 {
        match self {
            Part::Morning => 10,
            Part::Evening => 17,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReportIdError {
    #[error("`{0}` is not a cache file name")]
    NotCsv(String),
    #[error("`{0}` has no `-<part>` suffix")]
    MissingPart(String),
    #[error("invalid part `{0}`")]
    BadPart(String),
    #[error("invalid date `{0}`")]
    BadDate(String),
    #[error("unknown report prefix in `{0}`")]
    UnknownReport(String),
}

/// One source document: a report type, a date and a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReportId {
    pub report: ReportType,
    pub date: NaiveDate,
    pub part: Part,
}

impl ReportId {
    pub fn new(report: ReportType, date: NaiveDate, part: Part) -> Self {
        Self { report, date, part }
    }

    /// `{prefix}{MMDDYYYY}-{part}`, shared by the remote document and the cache file.
    pub fn stem(&self) -> String {
        format!(
            "{}{}-{}",
            self.report.file_prefix(),
            self.date.format("%m%d%Y"),
            self.part.number()
        )
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.stem())
    }

    /// Timestamp used for this document's rows in the assembled series.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date
            .and_hms_opt(self.part.hour(), 0, 0)
            .expect("part hours are valid")
    }

    /// Parse a cache file name such as `deaths-04012020-2.csv`.
    pub fn from_file_name(name: &str) -> Result<Self, ReportIdError> {
        let stem = name
            .strip_suffix(".csv")
            .ok_or_else(|| ReportIdError::NotCsv(name.to_string()))?;
        let (rest, part) = stem
            .rsplit_once('-')
            .ok_or_else(|| ReportIdError::MissingPart(name.to_string()))?;
        let part = part
            .parse::<u8>()
            .ok()
            .and_then(Part::from_number)
            .ok_or_else(|| ReportIdError::BadPart(part.to_string()))?;

        let (report, date_str) = match rest.rsplit_once('-') {
            Some((prefix, date)) => {
                let report = ReportType::from_str(prefix)
                    .filter(|r| *r != ReportType::Confirmed)
                    .ok_or_else(|| ReportIdError::UnknownReport(name.to_string()))?;
                (report, date)
            }
            None => (ReportType::Confirmed, rest),
        };

        if date_str.len() != 8 || !date_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReportIdError::BadDate(date_str.to_string()));
        }
        let date = NaiveDate::parse_from_str(date_str, "%m%d%Y")
            .map_err(|_| ReportIdError::BadDate(date_str.to_string()))?;

        Ok(Self { report, date, part })
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn stems_follow_publication_naming() {
        let c = ReportId::new(ReportType::Confirmed, date(2020, 3, 17), Part::Morning);
        assert_eq!(c.stem(), "03172020-1");
        assert_eq!(c.file_name(), "03172020-1.csv");

        let d = ReportId::new(ReportType::Deaths, date(2020, 4, 1), Part::Evening);
        assert_eq!(d.stem(), "deaths-04012020-2");

        let h = ReportId::new(ReportType::Hospitalizations, date(2020, 12, 31), Part::Morning);
        assert_eq!(h.file_name(), "hospitalizations-12312020-1.csv");
    }

    #[test]
    fn file_names_parse_back() {
        for report in ReportType::ALL {
            for part in Part::BOTH {
                let id = ReportId::new(report, date(2020, 5, 9), part);
                assert_eq!(ReportId::from_file_name(&id.file_name()), Ok(id));
            }
        }
    }

    #[test]
    fn foreign_file_names_are_rejected() {
        assert!(matches!(
            ReportId::from_file_name("notes.txt"),
            Err(ReportIdError::NotCsv(_))
        ));
        assert!(matches!(
            ReportId::from_file_name("03172020-3.csv"),
            Err(ReportIdError::BadPart(_))
        ));
        assert!(matches!(
            ReportId::from_file_name("13452020-1.csv"),
            Err(ReportIdError::BadDate(_))
        ));
        assert!(matches!(
            ReportId::from_file_name("tests-03172020-1.csv"),
            Err(ReportIdError::UnknownReport(_))
        ));
        assert!(matches!(
            ReportId::from_file_name("confirmed-03172020-1.csv"),
            Err(ReportIdError::UnknownReport(_))
        ));
    }

    #[test]
    fn parts_map_to_morning_and_evening_hours() {
        let am = ReportId::new(ReportType::Deaths, date(2020, 4, 1), Part::Morning);
        let pm = ReportId::new(ReportType::Deaths, date(2020, 4, 1), Part::Evening);
        assert_eq!(am.timestamp().to_string(), "2020-04-01 10:00:00");
        assert_eq!(pm.timestamp().to_string(), "2020-04-01 17:00:00");
    }
}
