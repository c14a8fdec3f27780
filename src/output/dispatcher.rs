use crate::error::Result;
use crate::output::result_set::ResultSet;
use crate::ui::OutputFormatter;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Where a result set goes. Closed set; dispatch is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Space-separated rows on stdout.
    Default,
    /// Aligned console table.
    Pretty,
    /// Timestamped CSV in the results directory.
    File,
}

/// Render or persist a result set. `Default` and `Pretty` write to
/// stdout; `File` writes `{mode_label}_{timestamp}.csv` under
/// `results_dir`, creating the directory on demand, and logs the path.
/// Filesystem errors propagate unmodified.
pub fn control_output(
    results: &ResultSet,
    target: OutputTarget,
    mode_label: &str,
    results_dir: &Path,
    formatter: &OutputFormatter,
) -> Result<()> {
    match target {
        OutputTarget::Default => {
            print!("{}", render_plain(results));
            Ok(())
        }
        OutputTarget::Pretty => {
            print!("{}", render_pretty(results));
            Ok(())
        }
        OutputTarget::File => {
            let path = write_csv(results, mode_label, results_dir)?;
            formatter.success(&format!("Results saved to: {}", path.display()));
            Ok(())
        }
    }
}

/// Each row's fields space-separated, one row per line, result-set order.
pub fn render_plain(results: &ResultSet) -> String {
    let mut out = String::new();
    for row in results.all_rows() {
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Aligned ASCII table: header row first, left-justified columns.
pub fn render_pretty(results: &ResultSet) -> String {
    let mut widths = vec![0usize; results.width()];
    for row in results.all_rows() {
        for (i, field) in row.iter().enumerate() {
            widths[i] = widths[i].max(console::measure_text_width(field));
        }
    }

    let rule = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let format_row = |row: &[String]| {
        let mut line = String::from("|");
        for (i, field) in row.iter().enumerate() {
            let pad = widths[i] - console::measure_text_width(field);
            line.push(' ');
            line.push_str(field);
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        line.push('\n');
        line
    };

    let mut out = String::new();
    out.push_str(&rule);
    out.push_str(&format_row(results.header()));
    out.push_str(&rule);
    for row in results.rows() {
        out.push_str(&format_row(row));
    }
    out.push_str(&rule);
    out
}

/// Comma-delimited, Unix line endings, header first. Fields containing
/// a comma, quote, or line break are double-quoted with inner quotes
/// doubled; everything else is written bare.
pub fn to_csv(results: &ResultSet) -> String {
    let mut out = String::new();
    for row in results.all_rows() {
        let line: Vec<Cow<'_, str>> = row.iter().map(|field| csv_field(field)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_csv(results: &ResultSet, mode_label: &str, results_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(results_dir)?;

    let timestamp = chrono::Local::now().format(DATETIME_FORMAT);
    let path = results_dir.join(format!("{}_{}.csv", mode_label, timestamp));
    fs::write(&path, to_csv(results))?;

    Ok(path)
}
