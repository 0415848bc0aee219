//! Observable events
//!
//! Every log line emitted by the crate carries one of these as its `event`
//! field so that output can be filtered by a stable name.

use std::fmt;

/// Observable events in the certification pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Mapping configuration loaded from disk
    ConfigLoaded,

    // Normalization
    /// Input columns renamed onto canonical names
    ColumnsNormalized,
    /// Normalization rejected a conflicting mapping
    NormalizationRejected,

    // Certification
    /// Table passed every schema check
    TableCertified,
    /// Table failed one or more schema checks
    CertificationRejected,

    // References
    /// All reference columns resolved
    ReferencesResolved,
    /// One or more reference columns failed to resolve
    ReferencesRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::ColumnsNormalized => "COLUMNS_NORMALIZED",
            Event::NormalizationRejected => "NORMALIZATION_REJECTED",

            Event::TableCertified => "TABLE_CERTIFIED",
            Event::CertificationRejected => "CERTIFICATION_REJECTED",

            Event::ReferencesResolved => "REFERENCES_RESOLVED",
            Event::ReferencesRejected => "REFERENCES_REJECTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake_case() {
        let events = [
            Event::ConfigLoaded,
            Event::ColumnsNormalized,
            Event::NormalizationRejected,
            Event::TableCertified,
            Event::CertificationRejected,
            Event::ReferencesResolved,
            Event::ReferencesRejected,
        ];
        for event in events {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
            assert_eq!(event.to_string(), name);
        }
    }
}
