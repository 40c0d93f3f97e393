//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(|e| std::io::Error::other(e))?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[strategy]
start_date = 1997-01-01
initial_cash = 10000
benchmark = SPY

[selection]
countries = USA,GBR,DEU,FRA
max_selection = 20
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("strategy", "benchmark"),
            Some("SPY".to_string())
        );
        assert_eq!(
            adapter.get_string("selection", "countries"),
            Some("USA,GBR,DEU,FRA".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[strategy]\ninitial_cash = 100\n").unwrap();
        assert_eq!(adapter.get_string("strategy", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[selection]\nmax_selection = 20\n").unwrap();
        assert_eq!(adapter.get_int("selection", "max_selection", 0), 20);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[selection]\n").unwrap();
        assert_eq!(adapter.get_int("selection", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[selection]\nmax_selection = abc\n").unwrap();
        assert_eq!(adapter.get_int("selection", "max_selection", 42), 42);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[selection]\nmin_revenue_growth = 0.07\n").unwrap();
        assert_eq!(
            adapter.get_double("selection", "min_revenue_growth", 0.0),
            0.07
        );
    }

    #[test]
    fn get_double_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[selection]\n").unwrap();
        assert_eq!(adapter.get_double("selection", "missing", 99.9), 99.9);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\ninitial_cash = not_a_number\n").unwrap();
        assert_eq!(adapter.get_double("strategy", "initial_cash", 99.9), 99.9);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[plot]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("plot", "a", false));
        assert!(adapter.get_bool("plot", "b", false));
        assert!(adapter.get_bool("plot", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[plot]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("plot", "a", true));
        assert!(!adapter.get_bool("plot", "b", true));
        assert!(!adapter.get_bool("plot", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[plot]\n").unwrap();
        assert!(adapter.get_bool("plot", "missing", true));
        assert!(!adapter.get_bool("plot", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[data]\nfundamentals = /path/to/fundamentals.csv\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "fundamentals"),
            Some("/path/to/fundamentals.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
