use serde::{Deserialize, Serialize};

use crate::SequenceError;

/// Validated name of a sequence, e.g. `QUOTE` or `JOB-2025`.
///
/// Non-empty after trimming; otherwise any text is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SequenceKey(String);

impl SequenceKey {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SequenceError> {
        let key = raw.as_ref().trim();
        if key.is_empty() {
            return Err(SequenceError::InvalidKey(
                "sequence type must not be empty".to_string(),
            ));
        }
        Ok(Self(key.to_string()))
    }

    /// Calendar-year scoped key: `yearly("JOB", 2025)` is `JOB-2025`.
    pub fn yearly(base: impl AsRef<str>, year: i32) -> Result<Self, SequenceError> {
        let base = Self::new(base)?;
        Self::new(format!("{}-{year}", base.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SequenceKey {
    type Error = SequenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SequenceKey> for String {
    fn from(value: SequenceKey) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_rejected() {
        assert!(matches!(SequenceKey::new(""), Err(SequenceError::InvalidKey(_))));
        assert!(matches!(SequenceKey::new("   "), Err(SequenceError::InvalidKey(_))));
        assert!(matches!(SequenceKey::new("\t\n"), Err(SequenceError::InvalidKey(_))));
    }

    #[test]
    fn any_non_blank_name_is_a_key() {
        assert_eq!(SequenceKey::new("JOB 2025").unwrap().as_str(), "JOB 2025");
        let long = "X".repeat(200);
        assert_eq!(SequenceKey::new(&long).unwrap().as_str(), long);
        assert_eq!(SequenceKey::new("DEVIS-Été").unwrap().as_str(), "DEVIS-Été");
    }

    #[test]
    fn keys_are_trimmed() {
        assert_eq!(SequenceKey::new("  QUOTE ").unwrap().as_str(), "QUOTE");
    }

    #[test]
    fn yearly_keys_append_the_year() {
        assert_eq!(SequenceKey::yearly("JOB", 2025).unwrap().as_str(), "JOB-2025");
        assert!(SequenceKey::yearly(" ", 2025).is_err());
    }
}
