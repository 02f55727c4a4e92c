//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_yaml::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Render a resolved tree for stdout.
pub fn render(tree: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(tree).context("Failed to render YAML"),
        OutputFormat::Json => serde_json::to_string_pretty(tree)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .context("Failed to render JSON"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Value {
        serde_yaml::from_str("greeting: HI\nother: 1\nlist: [a, 2]").expect("yaml")
    }

    #[test]
    fn test_render_yaml() {
        insta::assert_snapshot!(render(&tree(), OutputFormat::Yaml).expect("render"), @r"
        greeting: HI
        other: 1
        list:
        - a
        - 2
        ");
    }

    #[test]
    fn test_render_json() {
        insta::assert_snapshot!(render(&tree(), OutputFormat::Json).expect("render"), @r#"
        {
          "greeting": "HI",
          "other": 1,
          "list": [
            "a",
            2
          ]
        }
        "#);
    }
}
