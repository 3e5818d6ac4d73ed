//! Surveillance table loader.
//!
//! Reads the flat CSV table (one row per region, disease, row type and
//! week) into typed [`Record`]s. Column names are matched after trimming
//! and lower-casing, so `Region` and `region` are the same column. Rows
//! that fail to parse are skipped and counted rather than failing the
//! whole load.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use chrono::NaiveDate;
use epi_map_geography_models::RegionKey;
use epi_map_surveillance_models::{Record, RecordType};

use crate::SurveillanceError;
use crate::parsing::{parse_date, parse_integer, parse_non_negative, parse_optional};

/// Columns every table must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "region",
    "disease",
    "type",
    "date",
    "epiweek",
    "epiyear",
    "rate",
    "incident_cases",
];

/// Optional bound columns, with accepted alternate spellings.
const RATE_LOW: &[&str] = &["rate_low"];
const RATE_UP: &[&str] = &["rate_up", "rate_upp"];
const CASES_LOW: &[&str] = &["incident_cases_low"];
const CASES_UP: &[&str] = &["incident_cases_upp", "incident_cases_up"];

/// Result of loading a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableLoad {
    /// Parsed rows, in file order.
    pub records: Vec<Record>,
    /// Number of data rows that were skipped because they failed to parse.
    pub skipped: usize,
}

/// A (region, disease, row type) group that carries the same date more
/// than once.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DuplicateDate {
    pub region: RegionKey,
    pub disease: String,
    pub kind: RecordType,
    pub date: NaiveDate,
    /// How many rows share the date.
    pub count: usize,
}

impl std::fmt::Display for DuplicateDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} / {}: {} rows dated {}",
            self.region, self.disease, self.kind, self.count, self.date
        )
    }
}

/// Column positions resolved from the header row.
struct Columns {
    region: usize,
    disease: usize,
    kind: usize,
    date: usize,
    epiweek: usize,
    epiyear: usize,
    rate: usize,
    incident_cases: usize,
    rate_low: Option<usize>,
    rate_up: Option<usize>,
    cases_low: Option<usize>,
    cases_up: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, SurveillanceError> {
        let index: BTreeMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        let required = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| SurveillanceError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let optional =
            |names: &[&str]| -> Option<usize> { names.iter().find_map(|n| index.get(*n).copied()) };

        Ok(Self {
            region: required("region")?,
            disease: required("disease")?,
            kind: required("type")?,
            date: required("date")?,
            epiweek: required("epiweek")?,
            epiyear: required("epiyear")?,
            rate: required("rate")?,
            incident_cases: required("incident_cases")?,
            rate_low: optional(RATE_LOW),
            rate_up: optional(RATE_UP),
            cases_low: optional(CASES_LOW),
            cases_up: optional(CASES_UP),
        })
    }

    fn parse(&self, row: &csv::StringRecord) -> Result<Record, String> {
        let cell = |i: usize| row.get(i).unwrap_or("").trim();
        let bound = |i: Option<usize>, name: &str| -> Result<Option<f64>, String> {
            i.map_or(Ok(None), |i| {
                parse_optional(cell(i)).map_err(|()| format!("invalid {name} '{}'", cell(i)))
            })
        };

        let region = RegionKey::canonical(cell(self.region));
        if region.is_empty() {
            return Err("empty region".to_string());
        }
        let disease = cell(self.disease);
        if disease.is_empty() {
            return Err("empty disease".to_string());
        }
        let kind = cell(self.kind)
            .parse::<RecordType>()
            .map_err(|_| format!("unknown row type '{}'", cell(self.kind)))?;
        let date = parse_date(cell(self.date))
            .ok_or_else(|| format!("invalid date '{}'", cell(self.date)))?;
        let epiweek = parse_integer(cell(self.epiweek))
            .and_then(|w| u8::try_from(w).ok())
            .filter(|w| (1..=53).contains(w))
            .ok_or_else(|| format!("invalid epiweek '{}'", cell(self.epiweek)))?;
        let epiyear = parse_integer(cell(self.epiyear))
            .and_then(|y| i32::try_from(y).ok())
            .filter(|y| (1000..=9999).contains(y))
            .ok_or_else(|| format!("invalid epiyear '{}'", cell(self.epiyear)))?;
        let rate = parse_non_negative(cell(self.rate))
            .ok_or_else(|| format!("invalid rate '{}'", cell(self.rate)))?;
        let incident_cases = parse_non_negative(cell(self.incident_cases))
            .ok_or_else(|| format!("invalid incident_cases '{}'", cell(self.incident_cases)))?;

        Ok(Record {
            region,
            disease: disease.to_string(),
            kind,
            date,
            epiweek,
            epiyear,
            rate,
            rate_low: bound(self.rate_low, "rate_low")?,
            rate_up: bound(self.rate_up, "rate_up")?,
            incident_cases,
            incident_cases_low: bound(self.cases_low, "incident_cases_low")?,
            incident_cases_upp: bound(self.cases_up, "incident_cases_upp")?,
        })
    }
}

/// Loads a surveillance table from CSV text.
///
/// # Errors
///
/// * [`SurveillanceError::MissingColumn`] if a required column is absent
/// * [`SurveillanceError::Csv`] if the CSV itself is malformed
pub fn parse_table(text: &str) -> Result<TableLoad, SurveillanceError> {
    read_table(text.as_bytes())
}

/// Loads a surveillance table from any CSV reader.
///
/// Empty lines are ignored. Duplicate dates within a group are logged but
/// kept; the joiner's tie rules decide which row is used.
///
/// # Errors
///
/// * [`SurveillanceError::MissingColumn`] if a required column is absent
/// * [`SurveillanceError::Csv`] if the CSV itself is malformed
pub fn read_table<R: Read>(reader: R) -> Result<TableLoad, SurveillanceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::resolve(reader.headers()?)?;

    let mut load = TableLoad::default();

    for result in reader.records() {
        let row = result?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        match columns.parse(&row) {
            Ok(record) => load.records.push(record),
            Err(reason) => {
                let line = row.position().map_or(0, csv::Position::line);
                log::warn!("Skipping table line {line}: {reason}");
                load.skipped += 1;
            }
        }
    }

    for duplicate in duplicate_dates(&load.records) {
        log::warn!("Duplicate date in table: {duplicate}");
    }

    log::info!(
        "Loaded {} table rows ({} skipped)",
        load.records.len(),
        load.skipped
    );

    Ok(load)
}

/// Finds (region, disease, row type) groups with repeated dates.
#[must_use]
pub fn duplicate_dates(records: &[Record]) -> Vec<DuplicateDate> {
    let mut counts: BTreeMap<(&RegionKey, &str, RecordType, NaiveDate), usize> = BTreeMap::new();
    for record in records {
        *counts
            .entry((&record.region, record.disease.as_str(), record.kind, record.date))
            .or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((region, disease, kind, date), count)| DuplicateDate {
            region: region.clone(),
            disease: disease.to_string(),
            kind,
            date,
            count,
        })
        .collect()
}

/// Returns the distinct region keys of a table.
#[must_use]
pub fn region_keys<'a>(records: impl IntoIterator<Item = &'a Record>) -> BTreeSet<RegionKey> {
    records.into_iter().map(|r| r.region.clone()).collect()
}

/// Returns the distinct disease identifiers of a table.
#[must_use]
pub fn diseases(records: &[Record]) -> BTreeSet<String> {
    records.iter().map(|r| r.disease.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Region,disease,type,date,epiweek,epiyear,rate,rate_low,rate_up,incident_cases,incident_cases_low,incident_cases_upp
Sofala,malaria,Observado,2024-01-14,2,2024,12,,,300,,
Sofala,malaria,Previsto,2024-01-21,3,2024,13,11,15,320,280,360
sofala ,malaria,Forecast,2024-01-28T00:00:00.000Z,4,2024,15,12,18,370,300,440
Gaza,diarrhea,Observed,2024-01-14,2,2024,4.5,NA,NA,60,NA,NA
";

    #[test]
    fn parses_rows_and_canonicalizes_regions() {
        let load = parse_table(TABLE).unwrap();
        assert_eq!(load.skipped, 0);
        assert_eq!(load.records.len(), 4);

        let first = &load.records[0];
        assert_eq!(first.region.as_str(), "SOFALA");
        assert_eq!(first.kind, RecordType::Observed);
        assert_eq!(first.rate_low, None);

        let third = &load.records[2];
        assert_eq!(third.region.as_str(), "SOFALA");
        assert_eq!(third.kind, RecordType::Forecast);
        assert_eq!(third.date, NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());
        assert_eq!(third.rate_up, Some(18.0));
        assert_eq!(third.incident_cases_upp, Some(440.0));

        assert_eq!(load.records[3].incident_cases_low, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let text = "region,disease,type,date,epiweek,epiyear,rate\nGAZA,malaria,Observed,2024-01-14,2,2024,1\n";
        match parse_table(text) {
            Err(SurveillanceError::MissingColumn { column }) => {
                assert_eq!(column, "incident_cases");
            }
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn bound_columns_are_optional() {
        let text = "region,disease,type,date,epiweek,epiyear,rate,incident_cases\nGAZA,malaria,Observed,2024-01-14,2,2024,1.5,10\n";
        let load = parse_table(text).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.records[0].rate_up, None);
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let text = "\
region,disease,type,date,epiweek,epiyear,rate,incident_cases
GAZA,malaria,Observed,2024-01-14,2,2024,1.5,10
GAZA,malaria,Observed,yesterday,2,2024,1.5,10
GAZA,malaria,Projected,2024-01-14,2,2024,1.5,10
GAZA,malaria,Observed,2024-01-14,54,2024,1.5,10
GAZA,malaria,Observed,2024-01-14,2,2024,-1,10
,malaria,Observed,2024-01-14,2,2024,1,10

TETE,malaria,Observed,2024-01-14,2.0,2024,1,10
";
        let load = parse_table(text).unwrap();
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.skipped, 5);
        assert_eq!(load.records[1].region.as_str(), "TETE");
        assert_eq!(load.records[1].epiweek, 2);
    }

    #[test]
    fn invalid_bound_skips_row() {
        let text = "\
region,disease,type,date,epiweek,epiyear,rate,rate_low,rate_up,incident_cases
GAZA,malaria,Forecast,2024-01-14,2,2024,1.5,one,2,10
";
        let load = parse_table(text).unwrap();
        assert!(load.records.is_empty());
        assert_eq!(load.skipped, 1);
    }

    #[test]
    fn reports_duplicate_dates() {
        let text = "\
region,disease,type,date,epiweek,epiyear,rate,incident_cases
GAZA,malaria,Observed,2024-01-14,2,2024,1,10
gaza,malaria,Observed,2024-01-14,2,2024,2,20
GAZA,malaria,Forecast,2024-01-14,2,2024,3,30
";
        let load = parse_table(text).unwrap();
        let duplicates = duplicate_dates(&load.records);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].region.as_str(), "GAZA");
        assert_eq!(duplicates[0].kind, RecordType::Observed);
        assert_eq!(duplicates[0].count, 2);
    }

    #[test]
    fn lists_regions_and_diseases() {
        let load = parse_table(TABLE).unwrap();
        let regions: Vec<_> = region_keys(&load.records)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(regions, vec!["GAZA", "SOFALA"]);
        assert_eq!(
            diseases(&load.records).into_iter().collect::<Vec<_>>(),
            vec!["diarrhea", "malaria"]
        );
    }
}
