use serde::{Deserialize, Serialize};

/// Human-readable rendering of an allocated sequence value.
///
/// `prefix` is emitted verbatim, followed by the value zero-padded to
/// `padding` digits. Values wider than `padding` are printed in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub prefix: String,
    pub padding: usize,
}

impl NumberFormat {
    pub fn new(prefix: impl Into<String>, padding: usize) -> Self {
        Self {
            prefix: prefix.into(),
            padding,
        }
    }

    pub fn format(&self, value: i64) -> String {
        format!("{}{:0width$}", self.prefix, value, width = self.padding)
    }

    /// Default format for a base sequence type in a given calendar year.
    ///
    /// | type            | example            |
    /// |-----------------|--------------------|
    /// | `RFQ`           | `RFQ-2025-001`     |
    /// | `QUOTE`         | `QUO-2025-00001`   |
    /// | `JOB`           | `25-001`           |
    /// | `EMERGENCY_JOB` | `EJ-25-001`        |
    /// | `INVOICE`       | `IN000001`         |
    /// | anything else   | `<TYPE>-001`       |
    pub fn default_for(sequence_type: &str, year: i32) -> Self {
        let short_year = year.rem_euclid(100);
        match sequence_type.trim().to_ascii_uppercase().as_str() {
            "RFQ" => Self::new(format!("RFQ-{year}-"), 3),
            "QUOTE" => Self::new(format!("QUO-{year}-"), 5),
            "JOB" => Self::new(format!("{short_year:02}-"), 3),
            "EMERGENCY_JOB" => Self::new(format!("EJ-{short_year:02}-"), 3),
            "INVOICE" => Self::new("IN", 6),
            other => Self::new(format!("{other}-"), 3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pads_to_requested_width() {
        assert_eq!(NumberFormat::new("24-", 3).format(1), "24-001");
        assert_eq!(NumberFormat::new("", 5).format(42), "00042");
        assert_eq!(NumberFormat::new("X-", 0).format(7), "X-7");
    }

    #[test]
    fn wide_values_are_not_truncated() {
        assert_eq!(NumberFormat::new("24-", 3).format(12345), "24-12345");
    }

    #[test]
    fn defaults_per_document_type() {
        assert_eq!(NumberFormat::default_for("RFQ", 2025).format(1), "RFQ-2025-001");
        assert_eq!(NumberFormat::default_for("QUOTE", 2025).format(1), "QUO-2025-00001");
        assert_eq!(NumberFormat::default_for("job", 2025).format(12), "25-012");
        assert_eq!(NumberFormat::default_for("JOB", 2005).format(1), "05-001");
        assert_eq!(NumberFormat::default_for("EMERGENCY_JOB", 2025).format(3), "EJ-25-003");
        assert_eq!(NumberFormat::default_for("INVOICE", 2025).format(9), "IN000009");
        assert_eq!(NumberFormat::default_for("DELIVERY", 2025).format(9), "DELIVERY-009");
    }

    proptest! {
        /// Property: the digits after the prefix always read back as the value.
        #[test]
        fn digits_read_back_as_value(value in 1i64..10_000_000, padding in 0usize..9) {
            let fmt = NumberFormat::new("QUO-2025-", padding);
            let rendered = fmt.format(value);
            let digits = rendered.strip_prefix("QUO-2025-").unwrap();
            prop_assert!(digits.len() >= padding);
            prop_assert_eq!(digits.parse::<i64>().unwrap(), value);
        }
    }
}
