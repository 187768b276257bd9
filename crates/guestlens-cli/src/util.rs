use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use guestlens_analysis::{config::AnalysisConfig, record::RawRecord};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over
/// `verbose`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// JSON document written by every command.
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub command: &'static str,
    pub generated_at: DateTime<Utc>,
    pub result: T,
}

impl<T> Report<T> {
    pub fn new(command: &'static str, result: T) -> Self {
        Self {
            command,
            generated_at: Utc::now(),
            result,
        }
    }
}

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Wraps `result` in a [`Report`] and writes it to `output_path` or stdout.
    pub fn save_report<T>(
        command: &'static str,
        result: &T,
        output_path: Option<&Path>,
    ) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(&Report::new(command, result))?;
        if let Output::File { path, .. } = &output {
            tracing::info!(path = %path.display(), "report written");
        }
        Ok(())
    }

    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path.to_path_buf()),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads a JSON array of objects.
pub fn read_records_file<P>(file_kind: &str, path: P) -> anyhow::Result<Vec<RawRecord>>
where
    P: AsRef<Path>,
{
    let records: Vec<RawRecord> = read_json_file(file_kind, path)?;
    tracing::debug!(records = records.len(), file_kind, "loaded records");
    Ok(records)
}

/// Reads an analysis configuration, or the defaults when no path is given.
pub fn read_config_file(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    match path {
        Some(path) => read_json_file("config", path),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Turns an unsuccessful outcome into an error after its report was written.
pub fn ensure_success(success: bool, what: &str, errors: &[String]) -> anyhow::Result<()> {
    if success {
        return Ok(());
    }
    anyhow::bail!("{what} failed: {}", errors.join("; "))
}
