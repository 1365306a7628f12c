//! Output formatting for CLI

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "table" => OutputFormat::Table,
            _ => OutputFormat::Text,
        }
    }
}

/// Format output based on selected format
pub fn format_output<T: Serialize>(data: &T, format: &str) -> String {
    match OutputFormat::from(format) {
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table | OutputFormat::Text => {
            serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Print serializable data in the selected format
pub fn print_output<T: Serialize>(data: &T, format: &str) {
    println!("{}", format_output(data, format));
}

/// Render rows as a table
pub fn table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).to_string()
}

/// Format a single record; tables get one row
pub fn format_record<T: Serialize + Tabled>(data: &T, format: &str) -> String {
    match OutputFormat::from(format) {
        OutputFormat::Table => table(std::slice::from_ref(data)),
        OutputFormat::Json | OutputFormat::Text => format_output(data, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        name: String,
        size: u32,
    }

    #[test]
    fn test_record_as_table() {
        let row = Row {
            name: "poster".to_string(),
            size: 42,
        };
        let rendered = format_record(&row, "table");
        assert!(rendered.contains("name"));
        assert!(rendered.contains("poster"));
        assert!(!rendered.contains('{'));

        let json = format_record(&row, "json");
        assert!(json.contains("\"size\": 42"));
    }
}
