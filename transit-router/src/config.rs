//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default timetable location.
const DEFAULT_TIMETABLE: &str = "data/timetable.csv";

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors in the process configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key} {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings.
///
/// | Variable         | Meaning                                            |
/// |------------------|----------------------------------------------------|
/// | `TIMETABLE_CSV`  | timetable file (default `data/timetable.csv`)      |
/// | `CSV_DELIMITER`  | single-byte field delimiter (default `,`)          |
/// | `BIND_ADDR`      | listen address (default `127.0.0.1:3000`)          |
/// | `NOMINATIM_URL`  | geocoder base URL (default: public Nominatim)      |
/// | `GEOCODE_FILE`   | JSON address table; replaces Nominatim when set    |
/// | `OSRM_URL`       | road router base URL; straight lines when unset    |
/// | `MAP_OUTPUT_DIR` | directory for rendered maps (default `.`)          |
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub timetable_csv: PathBuf,
    pub csv_delimiter: u8,
    pub bind_addr: SocketAddr,
    pub nominatim_url: Option<String>,
    pub geocode_file: Option<PathBuf>,
    pub osrm_url: Option<String>,
    pub map_output_dir: PathBuf,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's
    /// value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind.clone(),
            reason: e.to_string(),
        })?;

        let csv_delimiter = match var("CSV_DELIMITER") {
            None => b',',
            Some(value) if value == "\\t" => b'\t',
            Some(value) if value.len() == 1 => value.as_bytes()[0],
            Some(value) => {
                return Err(ConfigError::Invalid {
                    key: "CSV_DELIMITER",
                    value,
                    reason: "expected a single byte".to_string(),
                });
            }
        };

        Ok(Self {
            timetable_csv: var("TIMETABLE_CSV")
                .unwrap_or_else(|| DEFAULT_TIMETABLE.to_string())
                .into(),
            csv_delimiter,
            bind_addr,
            nominatim_url: var("NOMINATIM_URL"),
            geocode_file: var("GEOCODE_FILE").map(PathBuf::from),
            osrm_url: var("OSRM_URL"),
            map_output_dir: var("MAP_OUTPUT_DIR").unwrap_or_else(|| ".".to_string()).into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.timetable_csv, PathBuf::from("data/timetable.csv"));
        assert_eq!(config.csv_delimiter, b',');
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.nominatim_url, None);
        assert_eq!(config.geocode_file, None);
        assert_eq!(config.osrm_url, None);
        assert_eq!(config.map_output_dir, PathBuf::from("."));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("TIMETABLE_CSV", "/srv/kvv.csv"),
            ("CSV_DELIMITER", ";"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("OSRM_URL", "http://osrm:5000"),
            ("GEOCODE_FILE", "addresses.json"),
            ("MAP_OUTPUT_DIR", "/tmp/maps"),
        ])
        .unwrap();

        assert_eq!(config.timetable_csv, PathBuf::from("/srv/kvv.csv"));
        assert_eq!(config.csv_delimiter, b';');
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.osrm_url.as_deref(), Some("http://osrm:5000"));
        assert_eq!(config.geocode_file, Some(PathBuf::from("addresses.json")));
        assert_eq!(config.map_output_dir, PathBuf::from("/tmp/maps"));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = config(&[("OSRM_URL", "  ")]).unwrap();
        assert_eq!(config.osrm_url, None);
    }

    #[test]
    fn tab_delimiter() {
        assert_eq!(config(&[("CSV_DELIMITER", "\\t")]).unwrap().csv_delimiter, b'\t');
    }

    #[test]
    fn invalid_values() {
        let err = config(&[("BIND_ADDR", "localhost")]).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));

        assert!(config(&[("CSV_DELIMITER", ";;")]).is_err());
    }
}
