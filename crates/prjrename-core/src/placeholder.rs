use regex::Regex;
use tracing::debug;

use crate::parameters::ParameterMap;

/// Resolves `[Name]` placeholders in filenames against a parameter map.
pub struct PlaceholderResolver {
    placeholder_pattern: Regex,
}

/// Result of resolving a filename template.
///
/// `resolved` may still contain literal placeholders when `missing` is not
/// empty. Such a result must never be committed to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: String,
    pub missing: Vec<String>,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

impl PlaceholderResolver {
    pub fn new() -> Result<Self, regex::Error> {
        // Non-greedy so `[A][B]` yields two spans rather than one.
        let placeholder_pattern = Regex::new(r"\[(.*?)\]")?;
        Ok(Self { placeholder_pattern })
    }

    /// Placeholder names in `template`, left to right, duplicates kept.
    pub fn placeholders(&self, template: &str) -> Vec<String> {
        self.placeholder_pattern
            .captures_iter(template)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    pub fn has_placeholders(&self, template: &str) -> bool {
        self.placeholder_pattern.is_match(template)
    }

    /// Substitutes every placeholder whose name is a parameter.
    ///
    /// Each resolved span is replaced everywhere it occurs in the working
    /// string, not just at the position it was found. Unknown names are
    /// reported in `missing` in first-seen order and their spans are left as is.
    pub fn resolve(&self, template: &str, parameters: &ParameterMap) -> Resolution {
        let mut resolved = template.to_string();
        let mut missing = Vec::new();

        for caps in self.placeholder_pattern.captures_iter(template) {
            let span = &caps[0];
            let name = &caps[1];

            match parameters.get(name) {
                Some(value) => {
                    resolved = resolved.replace(span, value);
                }
                None => missing.push(name.to_string()),
            }
        }

        if resolved != template {
            debug!("Placeholder resolution: '{}' -> '{}'", template, resolved);
        }

        Resolution { resolved, missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ParameterMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_all_placeholders() {
        let resolver = PlaceholderResolver::new().unwrap();

        let result = resolver.resolve("[X]_[Y].ext", &params(&[("X", "1"), ("Y", "2")]));

        assert_eq!(result.resolved, "1_2.ext");
        assert!(result.missing.is_empty());
        assert!(result.is_complete());
    }

    #[test]
    fn test_resolve_reports_missing() {
        let resolver = PlaceholderResolver::new().unwrap();

        let result = resolver.resolve("[X]_[Y].ext", &params(&[("X", "1")]));

        assert_eq!(result.missing, vec!["Y".to_string()]);
        assert_eq!(result.resolved, "1_[Y].ext");
        assert!(!result.is_complete());
    }

    #[test]
    fn test_adjacent_placeholders_are_not_merged() {
        let resolver = PlaceholderResolver::new().unwrap();

        assert_eq!(
            resolver.placeholders("[PCBANumber][Abbreviation]_ASSY.PCBDwf"),
            vec!["PCBANumber".to_string(), "Abbreviation".to_string()]
        );

        let result = resolver.resolve(
            "[PCBANumber][Abbreviation]_ASSY.PCBDwf",
            &params(&[("PCBANumber", "12345"), ("Abbreviation", "LPIO")]),
        );
        assert_eq!(result.resolved, "12345LPIO_ASSY.PCBDwf");
    }

    #[test]
    fn test_repeated_placeholder_replaced_everywhere() {
        let resolver = PlaceholderResolver::new().unwrap();

        let result = resolver.resolve("[Rev]_board_[Rev].txt", &params(&[("Rev", "B")]));

        assert_eq!(result.resolved, "B_board_B.txt");
        assert!(result.is_complete());
    }

    #[test]
    fn test_missing_names_keep_duplicates_in_order() {
        let resolver = PlaceholderResolver::new().unwrap();

        let result = resolver.resolve("[B]_[A]_[B]", &ParameterMap::new());

        assert_eq!(
            result.missing,
            vec!["B".to_string(), "A".to_string(), "B".to_string()]
        );
        assert_eq!(result.resolved, "[B]_[A]_[B]");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let resolver = PlaceholderResolver::new().unwrap();

        let result = resolver.resolve("[rev].txt", &params(&[("Rev", "B")]));

        assert_eq!(result.missing, vec!["rev".to_string()]);
    }

    #[test]
    fn test_template_without_placeholders() {
        let resolver = PlaceholderResolver::new().unwrap();

        assert!(!resolver.has_placeholders("plain.SchDoc"));
        let result = resolver.resolve("plain.SchDoc", &params(&[("X", "1")]));
        assert_eq!(result.resolved, "plain.SchDoc");
        assert!(result.is_complete());
    }
}
