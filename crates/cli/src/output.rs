// Output formatting for CLI
//
// Views build strings so they can be tested; commands print them.

use anyhow::Result;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            _ => OutputFormat::Text,
        }
    }

    /// Serialize for json/yaml output. Text output is rendered by the views.
    pub fn render_value<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(match self {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Text => String::new(),
        })
    }

    pub fn print_value<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = self.render_value(value)?;
        if !rendered.is_empty() {
            println!("{}", rendered.trim_end());
        }
        Ok(())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}

/// A simple key-value line
pub fn field(label: &str, value: &str) -> String {
    format!("{:<14} {}", format!("{}:", label), value)
}

/// Cut `value` to `width` characters, marking the cut with "..."
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut cut: String = value.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

/// Render a table with fixed column widths
///
/// Every column but the last is padded and cut to its width. The last
/// column is printed in full so long values such as URLs stay usable.
pub fn table(columns: &[(&str, usize)], rows: &[Vec<String>]) -> String {
    let header: Vec<String> = columns.iter().map(|(name, _)| name.to_string()).collect();
    std::iter::once(&header)
        .chain(rows)
        .map(|row| render_row(columns, row))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_row(columns: &[(&str, usize)], row: &[String]) -> String {
    let last = columns.len().saturating_sub(1);
    columns
        .iter()
        .zip(row)
        .enumerate()
        .map(|(i, ((_, width), val))| {
            if i == last {
                val.clone()
            } else {
                format!("{:<width$}", truncate(val, *width), width = width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Gate", 10), "Gate");
        assert_eq!(truncate("Kuzey Kapısı Kamerası", 10), "Kuzey K...");
    }

    #[test]
    fn test_table_pads_columns() {
        let rendered = table(
            &[("NAME", 6), ("PORT", 4)],
            &[vec!["Gate".to_string(), "8080".to_string()]],
        );
        assert_eq!(rendered, "NAME    PORT\nGate    8080");
    }

    #[test]
    fn test_table_last_column_is_never_cut() {
        let rendered = table(
            &[("NAME", 4), ("URL", 8)],
            &[vec!["Loading Dock".to_string(), "/violations/a-long-name.jpg".to_string()]],
        );
        assert_eq!(
            rendered,
            "NAME  URL\nL...  /violations/a-long-name.jpg"
        );
    }

    #[test]
    fn test_render_value_json() {
        let rendered = OutputFormat::Json
            .render_value(&serde_json::json!({"a": 1}))
            .unwrap();
        assert!(rendered.contains("\"a\": 1"));
        assert!(OutputFormat::Text.render_value(&1).unwrap().is_empty());
    }
}
