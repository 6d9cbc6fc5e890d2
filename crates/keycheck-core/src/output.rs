use anyhow::{anyhow, Result};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("unknown format: {s}")),
        }
    }
}

pub fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    writeln!(out, "{data}")?;
    Ok(())
}

/// Write a `=`-ruled section title.
pub fn write_banner<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    let rule = "=".repeat(60);
    writeln!(out, "{rule}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{rule}")?;
    writeln!(out)
}
