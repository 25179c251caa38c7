//! Report Module
//!
//! Consolidated end-of-batch notice.

use crate::batch::BatchResult;
use crate::common_utils::truncate_string;
use crate::progress::format_duration;
use console::style;
use std::fmt::{Display, Write};
use std::path::Path;
use std::time::Duration;

const MAX_ERROR_CHARS: usize = 160;

/// Renders the summary box plus the failure list.
pub fn render_summary_report<E: Display>(
    result: &BatchResult<E>,
    output_dir: &Path,
    duration: Duration,
    operation_name: &str,
) -> String {
    let mut out = String::new();
    let line = "═".repeat(60);

    let _ = writeln!(out);
    let _ = writeln!(out, "╔{}╗", line);
    let _ = writeln!(out, "  📊 {} Summary", operation_name);
    let _ = writeln!(out, "╠{}╣", line);
    let _ = writeln!(out, "  📁 Files Planned:      {:>10}", result.planned);
    let _ = writeln!(out, "  ✅ Succeeded:          {:>10}", result.succeeded);
    let _ = writeln!(out, "  ❌ Failed:             {:>10}", result.failed());
    if result.not_attempted() > 0 {
        let _ = writeln!(out, "  ⏭️  Not Attempted:      {:>10}", result.not_attempted());
    }
    let _ = writeln!(out, "  📈 Success Rate:       {:>9.1}%", result.success_rate());
    let _ = writeln!(out, "  📂 Output Folder:      {}", output_dir.display());
    let _ = writeln!(out, "  ⏱️  Total Time:         {:>10}", format_duration(duration));
    let _ = writeln!(out, "╚{}╝", line);

    if !result.failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "❌ Errors encountered:");
        for (path, error) in &result.failures {
            let _ = writeln!(
                out,
                "   {} → {}",
                path.display(),
                truncate_string(&error.to_string(), MAX_ERROR_CHARS)
            );
        }
    }

    if result.fatal {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "🚨 Batch stopped early: {} file(s) were not attempted",
            result.not_attempted()
        );
    }

    out
}

pub fn print_summary_report<E: Display>(
    result: &BatchResult<E>,
    output_dir: &Path,
    duration: Duration,
    operation_name: &str,
) {
    println!(
        "{}",
        render_summary_report(result, output_dir, duration, operation_name)
    );
}

/// One-line notice, e.g. `✅ Converted 3 files into 'Converted_2024-03-07'`.
pub fn print_simple_summary<E>(result: &BatchResult<E>, output_dir: &Path) {
    let headline = format!(
        "Converted {} files into '{}'",
        result.succeeded,
        output_dir.display()
    );
    if result.is_clean() {
        println!("{} {}", style("✅").green(), style(headline).green());
    } else {
        println!(
            "{} {} ({} failed)",
            style("⚠️").yellow(),
            style(headline).yellow(),
            result.failed()
        );
    }
}
