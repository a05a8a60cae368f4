//! Weighted-path table export.

use lightpath_core::metrics::PathMetrics;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Column headers of the CSV table.
pub const CSV_HEADER: [&str; 4] = [
    "Path",
    "Total accumulated latency [s]",
    "Total accumulated noise [W]",
    "SNR [dB]",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported export format for file: {file}")]
    UnsupportedFormat { file: PathBuf },
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Quote a CSV field if it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write one row per path: `A->B->C`, latency, noise, SNR.
pub fn write_csv<W: Write>(mut writer: W, metrics: &[PathMetrics]) -> Result<(), ExportError> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;
    for m in metrics {
        writeln!(
            writer,
            "{},{},{},{}",
            csv_field(&m.path_string()),
            m.latency,
            m.noise_power,
            m.snr_db
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the full metric records as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, metrics: &[PathMetrics]) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, metrics)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write `metrics` to `path`, choosing CSV or JSON from the extension.
pub fn export_file(path: &Path, metrics: &[PathMetrics]) -> Result<(), ExportError> {
    let extension = path.extension().and_then(|e| e.to_str());
    if !matches!(extension, Some("csv" | "json")) {
        return Err(ExportError::UnsupportedFormat {
            file: path.to_path_buf(),
        });
    }

    let writer = BufWriter::new(File::create(path)?);
    match extension {
        Some("json") => write_json(writer, metrics)?,
        _ => write_csv(writer, metrics)?,
    }
    info!(file = %path.display(), rows = metrics.len(), "results exported");
    Ok(())
}
