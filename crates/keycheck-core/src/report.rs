use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::output::{write_banner, write_json, OutputFormat};
use crate::text::truncate_chars;
use crate::types::ProbeResult;

/// Split into (working, failing), keeping input order within each group.
pub fn partition(results: &[ProbeResult]) -> (Vec<&ProbeResult>, Vec<&ProbeResult>) {
    results.iter().partition(|r| r.success)
}

/// 0 when every probe succeeded (including when there were none), 1 otherwise.
pub fn exit_code(results: &[ProbeResult]) -> u8 {
    if results.iter().all(|r| r.success) {
        0
    } else {
        1
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    working: usize,
    total: usize,
    exit_code: u8,
    results: &'a [ProbeResult],
}

/// Print the final report and return the process exit code.
pub fn report<W: Write>(
    results: &[ProbeResult],
    format: OutputFormat,
    detail_chars: usize,
    out: &mut W,
) -> Result<u8> {
    let code = exit_code(results);
    match format {
        OutputFormat::Json => {
            let working = results.iter().filter(|r| r.success).count();
            write_json(
                out,
                &JsonReport {
                    working,
                    total: results.len(),
                    exit_code: code,
                    results,
                },
            )?;
        }
        OutputFormat::Text => render_text(results, detail_chars, out)?,
    }
    Ok(code)
}

fn render_text<W: Write>(results: &[ProbeResult], detail_chars: usize, out: &mut W) -> Result<()> {
    let (working, failing) = partition(results);

    writeln!(out)?;
    write_banner(out, "Summary")?;

    if !working.is_empty() {
        writeln!(out, "Working APIs:")?;
        for r in &working {
            writeln!(out, "  {}", r.message)?;
        }
    }

    if !failing.is_empty() {
        writeln!(out)?;
        writeln!(out, "Failing APIs:")?;
        for r in &failing {
            writeln!(out, "  {}", r.message)?;
            if let Some(detail) = r.error_detail.as_deref() {
                writeln!(out, "    Details: {}", truncate_chars(detail, detail_chars))?;
            }
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}/{} working correctly",
        working.len(),
        results.len()
    )?;
    writeln!(out)?;
    Ok(())
}
