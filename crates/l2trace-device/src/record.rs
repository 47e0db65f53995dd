//! Structured command output.
//!
//! A parsed record is an ordered list of field/value pairs, in the order the
//! template declares its fields.

/// Key-value tuple representing a field and its value.
pub type FieldValue = (String, String);

/// Collection of field-value pairs for one parsed record.
pub type FieldValues = Vec<FieldValue>;

/// One record produced by a structured command (e.g., one CDP neighbor).
pub type Record = FieldValues;

/// Helper trait for working with field-value collections.
pub trait FieldValuesExt {
    /// Gets the value for a field, if present.
    fn get_field(&self, field: &str) -> Option<&str>;

    /// Gets the value for a field, returning the default if not present.
    fn get_field_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str;

    /// Checks if a field exists.
    fn has_field(&self, field: &str) -> bool;

    /// Returns the value of the first listed field that is present and non-empty.
    fn first_of(&self, fields: &[&str]) -> Option<&str> {
        fields
            .iter()
            .filter_map(|f| self.get_field(f))
            .find(|v| !v.is_empty())
    }
}

impl FieldValuesExt for FieldValues {
    fn get_field(&self, field: &str) -> Option<&str> {
        self.iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    fn get_field_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        self.get_field(field).unwrap_or(default)
    }

    fn has_field(&self, field: &str) -> bool {
        self.iter().any(|(f, _)| f == field)
    }
}

/// Builds a FieldValues collection from key-value pairs.
#[macro_export]
macro_rules! field_values {
    ($($field:expr => $value:expr),* $(,)?) => {
        vec![
            $(($field.to_string(), $value.to_string()),)*
        ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_values_ext() {
        let record: Record = field_values! {
            "local_port" => "GigabitEthernet1/0/1",
            "capabilities" => "Switch IGMP",
        };

        assert_eq!(record.get_field("local_port"), Some("GigabitEthernet1/0/1"));
        assert_eq!(record.get_field("nonexistent"), None);
        assert_eq!(record.get_field_or("platform", "N/A"), "N/A");
        assert!(record.has_field("capabilities"));
        assert!(!record.has_field("mgmt_ip"));
    }

    #[test]
    fn test_first_of_skips_missing_and_empty() {
        let record: Record = field_values! {
            "management_ip" => "",
            "mgmt_ip" => "10.1.1.3",
        };
        assert_eq!(record.first_of(&["management_ip", "mgmt_ip"]), Some("10.1.1.3"));
        assert_eq!(record.first_of(&["software_version", "version"]), None);
    }
}
