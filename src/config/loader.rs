use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{sanitize, FunnelmapConfig};

const CONFIG_FILE_NAME: &str = "funnelmap.toml";

/// Pure function to read config file contents
fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<FunnelmapConfig, String> {
    let mut config = toml::from_str::<FunnelmapConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;
    sanitize(&mut config);
    Ok(config)
}

/// Try loading config from a specific path; any failure falls back to None
pub fn try_load_config_from_path(config_path: &Path) -> Option<FunnelmapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // File-not-found is the normal case, not worth a warning
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {e}", config_path.display());
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            eprintln!("Warning: {e}. Using defaults.");
            None
        }
    }
}

/// Load `funnelmap.toml` from the working directory, defaulting silently
/// when absent or unreadable.
pub fn load_config() -> FunnelmapConfig {
    try_load_config_from_path(Path::new(CONFIG_FILE_NAME)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn parses_defaults_section() {
        let toml = indoc! {r#"
            [defaults]
            industry = "B2B SaaS"
            scale = "enterprise"
            avg_deal_size = 60000
            cost_per_visitor = 1.1

            [defaults.rates]
            visitorToLead = 0.02
            leadToMql = 0.3
            mqlToSql = 0.5
            sqlToOpportunity = 0.6
            opportunityToClose = 0.25
        "#};
        let config = parse_and_validate_config(toml).unwrap();
        assert_eq!(config.defaults.industry.as_deref(), Some("B2B SaaS"));
        assert_eq!(config.defaults.avg_deal_size, Some(60_000.0));
        assert_eq!(config.defaults.rates.unwrap().lead_to_mql, 0.3);
    }

    #[test]
    fn parses_extra_industry_rows() {
        let toml = indoc! {r#"
            [[industries]]
            name = "Dev Tools"

            [industries.rates]
            visitorToLead = { min = 0.01, avg = 0.02, max = 0.05 }
            leadToMql = { min = 0.2, avg = 0.3, max = 0.4 }
            mqlToSql = { min = 0.3, avg = 0.5, max = 0.7 }
            sqlToOpportunity = { min = 0.4, avg = 0.6, max = 0.8 }
            opportunityToClose = { min = 0.1, avg = 0.2, max = 0.3 }

            [industries.costPerVisitor]
            min = 0.5
            avg = 0.9
            max = 1.8

            [industries.cac]
            consumer = { min = 100, avg = 250, max = 600 }
            smb = { min = 500, avg = 1200, max = 3000 }
            middleMarket = { min = 2000, avg = 5000, max = 12000 }
            enterprise = { min = 8000, avg = 20000, max = 60000 }
        "#};
        let config = parse_and_validate_config(toml).unwrap();
        assert_eq!(config.industries.len(), 1);
        assert_eq!(config.industries[0].name, "Dev Tools");
        assert_eq!(config.industries[0].cost_per_visitor.avg, 0.9);
    }

    #[test]
    fn invalid_rate_values_are_dropped_not_fatal() {
        let toml = indoc! {r#"
            [defaults.rates]
            visitorToLead = 2.5
            leadToMql = 0.3
            mqlToSql = 0.5
            sqlToOpportunity = 0.6
            opportunityToClose = 0.25
        "#};
        let config = parse_and_validate_config(toml).unwrap();
        assert!(config.defaults.rates.is_none());
    }

    #[test]
    fn malformed_toml_is_an_error_string() {
        assert!(parse_and_validate_config("not [valid").is_err());
    }

    #[test]
    fn missing_file_yields_none() {
        assert!(try_load_config_from_path(Path::new("/nonexistent/funnelmap.toml")).is_none());
    }
}
