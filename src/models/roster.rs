//! Attendance roster handed over by the persistence layer.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::encoder::{self, EncodedBody};

/// One attendance session: a date and the student identifiers (RAs) captured.
///
/// `shift` and `ubs_name` are display metadata only; they never reach the portal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    /// Session date, `YYYY-MM-DD`
    pub date: String,

    /// Shift label (e.g. "Manhã")
    #[serde(default)]
    pub shift: String,

    /// Health unit (UBS) where attendance was taken
    #[serde(default)]
    pub ubs_name: String,

    /// Student identifiers in capture order
    #[serde(default)]
    pub ras: Vec<String>,
}

impl Roster {
    /// Create a roster for a calendar date.
    pub fn new(date: NaiveDate, ras: Vec<String>) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            shift: String::new(),
            ubs_name: String::new(),
            ras,
        }
    }

    /// Load a roster exported as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Encode this roster into the portal's upload format.
    pub fn encode(&self) -> EncodedBody {
        encoder::encode(&self.ras, &self.date)
    }

    /// File name used when exporting the encoded roster,
    /// `<date>_<shift>_<ubs>.csv`.
    pub fn export_file_name(&self) -> String {
        let shift = self.shift.trim().to_lowercase();
        let ubs = if self.ubs_name.trim().is_empty() {
            "ubs".to_string()
        } else {
            self.ubs_name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
        };
        format!("{}_{}_{}.csv", self.date, shift, ubs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_roster() -> Roster {
        Roster {
            date: "2026-02-09".to_string(),
            shift: "Manhã".to_string(),
            ubs_name: "UBS Vila  Nova".to_string(),
            ras: vec!["123".to_string(), "456".to_string()],
        }
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            sample_roster().export_file_name(),
            "2026-02-09_manhã_ubs-vila-nova.csv"
        );
    }

    #[test]
    fn test_export_file_name_without_site() {
        let mut roster = sample_roster();
        roster.ubs_name = " ".into();
        roster.shift = String::new();
        assert_eq!(roster.export_file_name(), "2026-02-09__ubs.csv");
    }

    #[test]
    fn test_new_formats_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        let roster = Roster::new(date, vec!["1".into()]);
        assert_eq!(roster.date, "2026-02-09");
    }

    #[test]
    fn test_encode_delegates() {
        assert_eq!(
            sample_roster().encode().as_str(),
            "ra;data\r\n123;09/02/2026\r\n456;09/02/2026\r\n"
        );
    }

    #[test]
    fn test_load_persistence_shape() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rollcall.json");
        fs::write(
            &path,
            r#"{"date":"2026-02-09","shift":"Tarde","ubsName":"UBS Centro","ras":["789"],"status":"finalized"}"#,
        )
        .unwrap();

        let roster = Roster::load(&path).unwrap();
        assert_eq!(roster.ubs_name, "UBS Centro");
        assert_eq!(roster.ras, vec!["789".to_string()]);
    }
}
