//! Shared output formatting for check reports.
//!
//! Provides JSON and plain-text formatters for `CheckReport`.
//! Color/terminal formatting is intentionally excluded from this core module;
//! that concern belongs to the CLI layer.

use std::io::Write;

use crate::report::CheckReport;

/// Format a `CheckReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &CheckReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `CheckReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &CheckReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  LICENSE HEADER CHECK")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Files checked:    {}", report.checked_files)?;
    writeln!(writer, "  With header:      {}", report.with_header)?;
    writeln!(writer, "  Without header:   {}", report.without_header.len())?;
    writeln!(writer, "  Scan errors:      {}", report.scan_errors.len())?;
    writeln!(writer)?;

    if !report.scan_errors.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  SCAN ERRORS (files that could not be checked)")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for scan_err in &report.scan_errors {
            writeln!(writer, "{}", scan_err.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    if !report.failures.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  FAILURES")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for failure in &report.failures {
            writeln!(writer, "{}", failure.format_human_readable())?;
        }
        writeln!(writer)?;
    } else if !report.without_header.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  MISSING HEADER (not blocking)")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for path in &report.without_header {
            writeln!(writer, "{}", path.display())?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.ok && report.without_header.is_empty() {
        writeln!(
            writer,
            "\u{2713} All {} checked files passed",
            report.checked_files
        )?;
    } else if report.ok {
        writeln!(
            writer,
            "\u{2713} No blocking failures in {} checked files ({} missing header)",
            report.checked_files,
            report.without_header.len()
        )?;
    } else {
        if !report.scan_errors.is_empty() {
            writeln!(
                writer,
                "\u{2717} {} file(s) could not be checked; CI must treat this as a failure",
                report.scan_errors.len()
            )?;
        }
        if !report.failures.is_empty() {
            writeln!(
                writer,
                "\u{2717} {} file(s) failed the license header check",
                report.failures_count()
            )?;
        }
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}
