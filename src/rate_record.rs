use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dated annual interest rate as it is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRecord {
    pub id: i64,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub rate: Decimal,
}

/// Request body for creating or updating a rate.
///
/// Both fields are optional so that an omitted value is reported by the
/// validator rather than rejected by the deserializer. An `id` sent by the
/// client is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RateCandidate {
    #[serde(default, with = "iso_date::option")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub rate: Option<Decimal>,
}

#[cfg(test)]
impl RateCandidate {
    pub fn new(date: NaiveDate, rate: Decimal) -> Self {
        Self {
            date: Some(date),
            rate: Some(rate),
        }
    }
}

/// A date and rate that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRate {
    pub date: NaiveDate,
    pub rate: Decimal,
}

impl NewRate {
    pub fn into_record(self, id: i64) -> RateRecord {
        RateRecord {
            id,
            date: self.date,
            rate: self.rate,
        }
    }
}

/// `YYYY-MM-DD` (de)serialization for calendar dates.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(raw, FORMAT)
            .map_err(|e| format!("Date must be a valid date in YYYY-MM-DD format, got \"{raw}\" ({e})"))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, de::Error};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|s| super::parse(&s).map_err(D::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_record_serializes_plain_date_and_number() {
        let record = RateRecord {
            id: 7,
            date: NaiveDate::from_ymd_opt(2024, 8, 8).unwrap(),
            rate: Decimal::from_str("5.25").unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 7, "date": "2024-08-08", "rate": 5.25 })
        );
    }

    #[test]
    fn test_candidate_ignores_client_id() {
        let candidate: RateCandidate =
            serde_json::from_str(r#"{"id": 99, "date": "2024-01-31", "rate": 4.5}"#).unwrap();

        assert_eq!(
            candidate,
            RateCandidate::new(
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                Decimal::from_str("4.5").unwrap()
            )
        );
    }

    #[test]
    fn test_candidate_rate_parsed_exactly() {
        let candidate: RateCandidate =
            serde_json::from_str(r#"{"date": "2024-01-01", "rate": 100.0000000000000001}"#)
                .unwrap();
        assert_eq!(candidate.rate, Some(Decimal::from_str("100.0000000000000001").unwrap()));

        let candidate: RateCandidate =
            serde_json::from_str(r#"{"date": "2024-01-01", "rate": 5.250}"#).unwrap();
        assert_eq!(candidate.rate.unwrap().to_string(), "5.250");
    }

    #[test]
    fn test_record_keeps_rate_scale() {
        let record = RateRecord {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            rate: Decimal::from_str("5.250").unwrap(),
        };

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":1,"date":"2024-01-01","rate":5.250}"#
        );
    }

    #[test]
    fn test_candidate_missing_fields_are_empty() {
        let candidate: RateCandidate = serde_json::from_str("{}").unwrap();
        assert_eq!(candidate, RateCandidate::default());

        let candidate: RateCandidate =
            serde_json::from_str(r#"{"date": null, "rate": null}"#).unwrap();
        assert_eq!(candidate, RateCandidate::default());
    }

    #[test]
    fn test_malformed_date_is_a_parse_error() {
        let err = serde_json::from_str::<RateCandidate>(r#"{"date": "13-45-2024", "rate": 1}"#)
            .unwrap_err();

        assert!(err.is_data());
        assert!(err.to_string().contains("Date must be a valid date"));
        assert!(err.to_string().contains("13-45-2024"));
    }

    #[test]
    fn test_impossible_calendar_date_is_rejected() {
        assert!(iso_date::parse("2023-02-29").is_err());
        assert!(iso_date::parse("2024-02-29").is_ok());
    }
}
