use std::collections::HashMap;
use std::fs;
use std::path::Path;
use regex::Regex;
use tracing::{debug, error};

/// Parameter name to value, as declared in the descriptor's `[ParameterN]` blocks.
pub type ParameterMap = HashMap<String, String>;

pub struct ParameterExtractor {
    header_pattern: Regex,
    name_pattern: Regex,
    value_pattern: Regex,
}

impl ParameterExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            header_pattern: Regex::new(r"^\[Parameter\d+\]")?,
            name_pattern: Regex::new(r"^Name=(.+)")?,
            value_pattern: Regex::new(r"^Value=(.+)")?,
        })
    }

    /// Parses `Name=`/`Value=` pairs out of descriptor content.
    ///
    /// A `Name=` line arms a pending name and the next `Value=` line claims it.
    /// Block headers disarm it, so a stray `Value=` is never attributed to a
    /// name from a previous block. Later names overwrite earlier ones.
    pub fn parse(&self, content: &str) -> ParameterMap {
        let mut parameters = ParameterMap::new();
        let mut pending_name: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();

            if self.header_pattern.is_match(line) {
                pending_name = None;
                continue;
            }

            if let Some(caps) = self.name_pattern.captures(line) {
                pending_name = Some(caps[1].trim().to_string());
                continue;
            }

            if let Some(caps) = self.value_pattern.captures(line) {
                if let Some(name) = pending_name.take() {
                    let value = caps[1].trim().to_string();
                    debug!("Parameter: {} = {}", name, value);
                    parameters.insert(name, value);
                }
            }
        }

        parameters
    }

    /// Reads and parses the descriptor at `path`.
    ///
    /// An unreadable descriptor is reported and yields an empty map; callers
    /// treat "no parameters" as a valid outcome.
    pub fn extract(&self, path: &Path) -> ParameterMap {
        match fs::read_to_string(path) {
            Ok(content) => self.parse(&content),
            Err(e) => {
                error!("Error reading parameters from project file {:?}: {}", path, e);
                ParameterMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "[Design]\r\n\
        Version=1.0\r\n\
        [Parameter1]\r\n\
        Name=PCBANumber\r\n\
        Value=12345\r\n\
        [Parameter2]\r\n\
        Name=Abbreviation\r\n\
        Value=LPIO\r\n";

    #[test]
    fn test_parse_parameter_blocks() {
        let extractor = ParameterExtractor::new().unwrap();
        let parameters = extractor.parse(PROJECT);

        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.get("PCBANumber"), Some(&"12345".to_string()));
        assert_eq!(parameters.get("Abbreviation"), Some(&"LPIO".to_string()));
    }

    #[test]
    fn test_last_write_wins() {
        let extractor = ParameterExtractor::new().unwrap();
        let content = "[Parameter1]\nName=A\nValue=1\n[Parameter2]\nName=A\nValue=2\n";

        let parameters = extractor.parse(content);

        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters.get("A"), Some(&"2".to_string()));
    }

    #[test]
    fn test_header_clears_pending_name() {
        let extractor = ParameterExtractor::new().unwrap();
        let content = "[Parameter1]\nName=Orphan\n[Parameter2]\nValue=stray\nName=Kept\nValue=yes\n";

        let parameters = extractor.parse(content);

        assert!(!parameters.contains_key("Orphan"));
        assert_eq!(parameters.get("Kept"), Some(&"yes".to_string()));
        assert_eq!(parameters.len(), 1);
    }

    #[test]
    fn test_value_without_name_is_ignored() {
        let extractor = ParameterExtractor::new().unwrap();
        let parameters = extractor.parse("Value=nothing\n[Parameter1]\nValue=still nothing\n");

        assert!(parameters.is_empty());
    }

    #[test]
    fn test_name_claims_only_one_value() {
        let extractor = ParameterExtractor::new().unwrap();
        let parameters = extractor.parse("Name=Rev\nValue=A\nValue=B\n");

        assert_eq!(parameters.get("Rev"), Some(&"A".to_string()));
    }

    #[test]
    fn test_values_are_trimmed() {
        let extractor = ParameterExtractor::new().unwrap();
        let parameters = extractor.parse("  Name= Board  \n\tValue=  Main Board \n");

        assert_eq!(parameters.get("Board"), Some(&"Main Board".to_string()));
    }

    #[test]
    fn test_empty_value_line_is_not_a_value() {
        let extractor = ParameterExtractor::new().unwrap();
        let parameters = extractor.parse("Name=Rev\nValue=\nValue=B\n");

        assert_eq!(parameters.get("Rev"), Some(&"B".to_string()));
    }

    #[test]
    fn test_extract_missing_file_returns_empty() {
        let extractor = ParameterExtractor::new().unwrap();
        let parameters = extractor.extract(Path::new("/nonexistent/project.PrjPcb"));

        assert!(parameters.is_empty());
    }
}
