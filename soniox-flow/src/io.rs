//! Reading items and parameters, writing output items

use std::path::Path;

use anyhow::Context as _;
use serde_json::{Map, Value};
use soniox_node::{Item, OutputItem};

/// Read a JSON array of input items
pub async fn read_items(path: &Path) -> anyhow::Result<Vec<Item>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read items from {}", path.display()))?;

    parse_items(&raw).with_context(|| format!("invalid items in {}", path.display()))
}

fn parse_items(raw: &str) -> anyhow::Result<Vec<Item>> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        // a bare object is a batch of one
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        _ => anyhow::bail!("expected a JSON array of items"),
    }
}

/// Read node-level parameters; none given means an empty object
pub async fn read_parameters(path: Option<&Path>) -> anyhow::Result<Map<String, Value>> {
    let Some(path) = path else {
        return Ok(Map::new());
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read parameters from {}", path.display()))?;

    match serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("parameters in {} must be a JSON object", path.display()),
    }
}

/// Write output items to a file, or to stdout when no path is given
pub async fn write_items(path: Option<&Path>, items: &[OutputItem]) -> anyhow::Result<()> {
    let mut rendered = serde_json::to_string_pretty(items).context("failed to serialize output items")?;
    rendered.push('\n');

    match path {
        Some(path) => tokio::fs::write(path, rendered)
            .await
            .with_context(|| format!("failed to write output to {}", path.display())),
        None => {
            use tokio::io::AsyncWriteExt as _;

            let mut stdout = tokio::io::stdout();
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}
