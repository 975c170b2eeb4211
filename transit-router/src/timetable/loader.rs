//! CSV timetable loader.
//!
//! Each record is one scheduled ride segment. Malformed records are
//! skipped and counted rather than failing the whole load: regional
//! exports routinely contain a handful of broken rows, and one bad row
//! should not take the service down.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::domain::{Coordinates, parse_time_to_minutes, parse_travel_time};

use super::error::{LoadError, RecordError};
use super::graph::TimetableGraph;

/// Column names of the timetable CSV.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub source_column: String,
    pub target_column: String,
    pub line_column: String,
    /// Departure clock, parsed with `parse_time_to_minutes`.
    pub departure_column: String,
    /// Ride duration, parsed with `parse_travel_time`.
    pub travel_time_column: String,
    pub source_lat_column: String,
    pub source_lon_column: String,
    pub target_lat_column: String,
    pub target_lon_column: String,
    /// Field delimiter.
    pub delimiter: u8,
}

impl LoaderConfig {
    /// Use a different field delimiter (e.g. `b';'`).
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source_column: "source".to_string(),
            target_column: "target".to_string(),
            line_column: "line".to_string(),
            departure_column: "departure".to_string(),
            travel_time_column: "travel_time".to_string(),
            source_lat_column: "source_lat".to_string(),
            source_lon_column: "source_lon".to_string(),
            target_lat_column: "target_lat".to_string(),
            target_lon_column: "target_lon".to_string(),
            delimiter: b',',
        }
    }
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedTimetable {
    pub graph: TimetableGraph,
    /// Records turned into ride edges.
    pub records_loaded: usize,
    /// Malformed records that were skipped.
    pub records_skipped: usize,
}

/// Load a timetable CSV file into a graph.
///
/// Fails if the file cannot be opened or a required column is missing.
/// Individual malformed records are skipped (see `records_skipped`).
pub fn load_timetable(
    path: impl AsRef<Path>,
    config: &LoaderConfig,
) -> Result<LoadedTimetable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "Loading timetable");
    load_timetable_from_reader(file, config)
}

/// Load a timetable from any CSV byte stream.
pub fn load_timetable_from_reader<R: Read>(
    reader: R,
    config: &LoaderConfig,
) -> Result<LoadedTimetable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::resolve(csv_reader.headers()?, config)?;

    let mut graph = TimetableGraph::new();
    let mut records_loaded = 0;
    let mut records_skipped = 0;

    for (row, result) in csv_reader.records().enumerate() {
        // Header is line 1.
        let line_no = row + 2;

        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(LoadError::Csv(e)),
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping unreadable timetable record");
                records_skipped += 1;
                continue;
            }
        };

        match columns.parse(&record) {
            Ok(ride) => {
                graph.add_edge(
                    ride.source,
                    ride.target,
                    ride.line,
                    ride.departure,
                    ride.travel_time,
                    ride.source_coords,
                    ride.target_coords,
                );
                records_loaded += 1;
            }
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed timetable record");
                records_skipped += 1;
            }
        }
    }

    info!(
        stops = graph.len(),
        rides = records_loaded,
        skipped = records_skipped,
        "Timetable loaded"
    );

    Ok(LoadedTimetable {
        graph,
        records_loaded,
        records_skipped,
    })
}

/// Header positions of the configured columns.
struct Columns {
    source: usize,
    target: usize,
    line: usize,
    departure: usize,
    travel_time: usize,
    source_lat: Option<usize>,
    source_lon: Option<usize>,
    target_lat: Option<usize>,
    target_lon: Option<usize>,
}

/// One parsed record, borrowing names from the CSV record.
struct Ride<'r> {
    source: &'r str,
    target: &'r str,
    line: &'r str,
    departure: f64,
    travel_time: f64,
    source_coords: Option<Coordinates>,
    target_coords: Option<Coordinates>,
}

impl Columns {
    fn resolve(headers: &StringRecord, config: &LoaderConfig) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
        };

        let columns = Self {
            source: require(&config.source_column)?,
            target: require(&config.target_column)?,
            line: require(&config.line_column)?,
            departure: require(&config.departure_column)?,
            travel_time: require(&config.travel_time_column)?,
            source_lat: find(&config.source_lat_column),
            source_lon: find(&config.source_lon_column),
            target_lat: find(&config.target_lat_column),
            target_lon: find(&config.target_lon_column),
        };

        if columns.source_lat.is_none() && columns.target_lat.is_none() {
            debug!("Timetable has no coordinate columns");
        }

        Ok(columns)
    }

    fn parse<'r>(&self, record: &'r StringRecord) -> Result<Ride<'r>, RecordError> {
        let source = required(record, self.source, "source")?;
        let target = required(record, self.target, "target")?;
        let line = required(record, self.line, "line")?;

        let departure = parse_time_to_minutes(required(record, self.departure, "departure")?)
            .map_err(|source| RecordError::BadTime {
                field: "departure",
                source,
            })?;

        // An empty duration is a zero-minute hop.
        let travel_time = parse_travel_time(optional(record, Some(self.travel_time)).unwrap_or(""))
            .map_err(|source| RecordError::BadTime {
                field: "travel_time",
                source,
            })?;

        let source_coords = coordinates(record, self.source_lat, self.source_lon, "source")?;
        let target_coords = coordinates(record, self.target_lat, self.target_lon, "target")?;

        Ok(Ride {
            source,
            target,
            line,
            departure,
            travel_time,
            source_coords,
            target_coords,
        })
    }
}

fn required<'r>(
    record: &'r StringRecord,
    idx: usize,
    field: &'static str,
) -> Result<&'r str, RecordError> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(RecordError::EmptyField(field)),
        None => Err(RecordError::Malformed(format!(
            "{} fields, no column for {field:?}",
            record.len()
        ))),
    }
}

/// A present, non-empty value. pandas writes missing numbers as `nan`.
fn optional(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    let value = record.get(idx?)?;
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value)
    }
}

fn number(value: &str, field: &'static str) -> Result<f64, RecordError> {
    value.parse().map_err(|_| RecordError::BadNumber {
        field,
        value: value.to_string(),
    })
}

fn coordinates(
    record: &StringRecord,
    lat_idx: Option<usize>,
    lon_idx: Option<usize>,
    which: &'static str,
) -> Result<Option<Coordinates>, RecordError> {
    match (optional(record, lat_idx), optional(record, lon_idx)) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => Ok(Some(Coordinates::new(
            number(lat, "latitude")?,
            number(lon, "longitude")?,
        ))),
        _ => Err(RecordError::IncompleteCoordinates(which)),
    }
}
