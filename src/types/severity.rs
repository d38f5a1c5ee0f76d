//! Log severities and how each platform presents them

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Teams theme color used for severities outside the known set
pub const DEFAULT_THEME_COLOR: &str = "00AA00";

/// Severity of a log record
///
/// The seven known levels follow the npm-style level names. Any other label
/// is kept verbatim in [`Severity::Custom`] and rendered with the
/// `info` presentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Http,
    Verbose,
    Debug,
    Silly,
    Custom(String),
}

impl Severity {
    /// Parse a severity label. Unknown labels become [`Severity::Custom`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "error" => Severity::Error,
            "warn" => Severity::Warn,
            "info" => Severity::Info,
            "http" => Severity::Http,
            "verbose" => Severity::Verbose,
            "debug" => Severity::Debug,
            "silly" => Severity::Silly,
            other => Severity::Custom(other.to_string()),
        }
    }

    /// The label used as the severity tag in rendered messages
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Http => "http",
            Severity::Verbose => "verbose",
            Severity::Debug => "debug",
            Severity::Silly => "silly",
            Severity::Custom(label) => label,
        }
    }

    /// Teams card theme color (hex RGB without the leading `#`)
    pub fn theme_color(&self) -> &'static str {
        match self {
            Severity::Error => "AA0000",
            Severity::Warn => "AA5500",
            Severity::Info | Severity::Http => "00AA00",
            Severity::Verbose => "00AAAA",
            Severity::Debug => "0000AA",
            Severity::Silly => "AA00AA",
            Severity::Custom(_) => DEFAULT_THEME_COLOR,
        }
    }

    /// Check whether this is one of the seven known levels
    pub fn is_known(&self) -> bool {
        !matches!(self, Severity::Custom(_))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Severity {
    fn from(label: &str) -> Self {
        Severity::from_label(label)
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::DEBUG => Severity::Debug,
            _ => Severity::Silly,
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Severity::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_colors() {
        let cases = [
            ("error", "AA0000"),
            ("warn", "AA5500"),
            ("info", "00AA00"),
            ("http", "00AA00"),
            ("verbose", "00AAAA"),
            ("debug", "0000AA"),
            ("silly", "AA00AA"),
        ];
        for (label, color) in cases {
            let severity = Severity::from_label(label);
            assert!(severity.is_known(), "{label} should be a known level");
            assert_eq!(severity.theme_color(), color, "color for {label}");
            assert_eq!(severity.as_str(), label);
        }
    }

    #[test]
    fn test_unknown_label_uses_default() {
        let severity = Severity::from_label("critical");
        assert_eq!(severity, Severity::Custom("critical".to_string()));
        assert!(!severity.is_known());
        assert_eq!(severity.theme_color(), DEFAULT_THEME_COLOR);
        assert_eq!(severity.theme_color(), Severity::Info.theme_color());
        assert_eq!(severity.as_str(), "critical");
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(Severity::from_label("ERROR"), Severity::Custom("ERROR".to_string()));
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Severity::from(tracing::Level::ERROR), Severity::Error);
        assert_eq!(Severity::from(tracing::Level::WARN), Severity::Warn);
        assert_eq!(Severity::from(tracing::Level::INFO), Severity::Info);
        assert_eq!(Severity::from(tracing::Level::DEBUG), Severity::Debug);
        assert_eq!(Severity::from(tracing::Level::TRACE), Severity::Silly);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Severity::Verbose).unwrap();
        assert_eq!(json, "\"verbose\"");

        let parsed: Severity = serde_json::from_str("\"notice\"").unwrap();
        assert_eq!(parsed, Severity::Custom("notice".to_string()));
    }
}
