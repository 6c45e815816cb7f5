use std::fmt;

use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::PipelineResult;

/// The instant a run started. Every artifact of one run carries the same
/// stamp, so files from one run sort together and runs that start in
/// different seconds never share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp(OffsetDateTime);

impl RunStamp {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn datetime(&self) -> OffsetDateTime {
        self.0
    }

    /// `YYYYMMDD_HHMMSS`, used in file names.
    pub fn file_stamp(&self) -> PipelineResult<String> {
        Ok(self
            .0
            .format(format_description!("[year][month][day]_[hour][minute][second]"))?)
    }
}

impl fmt::Display for RunStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn stamp(unix: i64) -> RunStamp {
        RunStamp::from_datetime(OffsetDateTime::from_unix_timestamp(unix).unwrap())
    }

    #[test]
    fn test_file_stamp_format() {
        // 2024-01-15 09:05:07 UTC
        assert_eq!(stamp(1_705_309_507).file_stamp().unwrap(), "20240115_090507");
        assert_eq!(stamp(1_705_309_507).to_string(), "2024-01-15 09:05:07");
    }

    #[test]
    fn test_runs_a_second_apart_never_collide() {
        let first = stamp(1_705_309_507);
        let later = RunStamp::from_datetime(first.datetime() + Duration::seconds(1));
        assert_ne!(first.file_stamp().unwrap(), later.file_stamp().unwrap());
    }

    #[test]
    fn test_runs_within_the_same_second_share_a_stamp() {
        let first = stamp(1_705_309_507);
        let same_second = RunStamp::from_datetime(first.datetime() + Duration::milliseconds(400));
        assert_eq!(first.file_stamp().unwrap(), same_second.file_stamp().unwrap());
    }
}
