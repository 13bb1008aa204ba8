//! Report rendering and exit-code mapping.

use std::io::{self, Write};

use codewatch_core::StabilityReport;

/// Bytecode was constant across every sample.
pub const EXIT_STABLE: i32 = 0;
/// Usage, configuration or connectivity failure.
pub const EXIT_ERROR: i32 = 1;
/// At least one bytecode change was observed.
pub const EXIT_CHANGED: i32 = 2;

/// Map the verdict to the process exit code.
pub fn exit_code(report: &StabilityReport) -> i32 {
    if report.changes_detected {
        EXIT_CHANGED
    } else {
        EXIT_STABLE
    }
}

/// Human-readable summary.
pub fn write_text<W: Write>(out: &mut W, report: &StabilityReport) -> io::Result<()> {
    writeln!(out, "codewatch — bytecode stability check")?;
    writeln!(out, "RPC:         {}", report.rpc_endpoint)?;
    if let Some(chain_id) = report.chain_id {
        writeln!(out, "Chain ID:    {chain_id}")?;
    }
    writeln!(out, "Address:     {}", report.address)?;
    writeln!(
        out,
        "Block range: {} → {} (step {})",
        report.from_block, report.to_block, report.step
    )?;
    writeln!(out)?;

    if !report.history.is_empty() {
        writeln!(out, "  {:>12}  {:>7}  {:>7}  HASH", "BLOCK", "SIZE", "NONCE")?;
        for meta in &report.history {
            let nonce = meta
                .nonce
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".into());
            let hash = meta
                .code_hash
                .map(|h| h.to_string())
                .unwrap_or_else(|| "-".into());
            writeln!(
                out,
                "  {:>12}  {:>7}  {:>7}  {}",
                meta.block,
                meta.code_size,
                nonce,
                hash
            )?;
        }
        writeln!(out)?;
    }

    for change in &report.changes {
        writeln!(out, "Change at {change}")?;
    }

    writeln!(out, "Sampled {} block points.", report.sample_count())?;
    if report.changes_detected {
        writeln!(out, "Contract bytecode changed during the monitored range.")?;
    } else {
        writeln!(out, "Contract bytecode remained stable across all sampled blocks.")?;
    }
    writeln!(out, "Completed in {:.2}s", report.elapsed_seconds)
}

/// Pretty-printed JSON document.
pub fn write_json<W: Write>(out: &mut W, report: &StabilityReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}
