//! Console output: progress emitters and result rendering.

use crate::config::PackagerConfig;
use crate::exit_codes::ExitCode;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use skillpack_bundle::{PackageError, PackageEvent, PackageReport, ProgressEmitter};
use std::io::{self, Write};
use std::sync::Mutex;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable progress lines
    #[default]
    Human,

    /// JSON result on stdout, JSONL progress on stderr
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Prints progress as plain lines.
pub struct HumanEmitter<W: Write> {
    out: Mutex<W>,
}

impl HumanEmitter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> HumanEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> ProgressEmitter for HumanEmitter<W> {
    fn emit(&self, event: &PackageEvent) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        // Console output is best effort.
        let _ = match event {
            PackageEvent::Validating { .. } => writeln!(out, "Validating skill..."),
            PackageEvent::Validated { message, .. } => writeln!(out, "{message}\n"),
            PackageEvent::EntryAdded { entry, .. } => writeln!(out, "  Added: {entry}"),
            PackageEvent::Completed { .. } | PackageEvent::Failed { .. } => Ok(()),
            PackageEvent::PartialRemoved { archive } => {
                writeln!(out, "  Removed partial archive: {}", archive.display())
            }
        };
    }
}

/// Writes progress as JSON lines.
pub struct JsonlEmitter<W: Write> {
    out: Mutex<W>,
}

impl JsonlEmitter<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> JsonlEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> ProgressEmitter for JsonlEmitter<W> {
    fn emit(&self, event: &PackageEvent) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", event.to_jsonl());
            let _ = out.flush();
        }
    }
}

pub fn write_banner(out: &mut impl Write, config: &PackagerConfig) -> io::Result<()> {
    writeln!(out, "Skill Packager")?;
    writeln!(out, "   Skill directory: {}", config.skill_dir.display())?;
    writeln!(out, "   Output directory: {}", config.display_output_dir().display())?;
    if config.dry_run {
        writeln!(out, "   Dry run: nothing will be written")?;
    }
    writeln!(out)
}

pub fn write_success(out: &mut impl Write, report: &PackageReport) -> io::Result<()> {
    if report.dry_run {
        writeln!(
            out,
            "\nDry run passed: {} entries would be packaged to {}",
            report.entry_count(),
            report.archive_path.display()
        )?;
        return Ok(());
    }

    writeln!(
        out,
        "\nSuccessfully packaged skill to: {}",
        report.archive_path.display()
    )?;
    writeln!(out, "   File size: {:.1} KB", report.archive_size_kb())?;

    let file_name = report
        .archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    writeln!(out, "\nDone! Your skill is ready to distribute.")?;
    writeln!(out, "   Upload {file_name} to Claude.ai -> Settings -> Skills")
}

pub fn write_failure(out: &mut impl Write, err: &PackageError) -> io::Result<()> {
    match err {
        PackageError::Validation(_) => {
            writeln!(out, "{err}")?;
            writeln!(out, "   Please fix the validation errors before packaging.")?;
        }
        _ => writeln!(out, "Error: {err}")?,
    }
    writeln!(out, "\nPackaging failed. Please fix the errors above.")
}

/// JSON document printed on stdout for `--format json`.
pub fn result_json(result: &Result<PackageReport, PackageError>) -> Value {
    match result {
        Ok(report) => json!({
            "ok": true,
            "exit_code": ExitCode::Clean.code_name(),
            "report": report,
        }),
        Err(err) => {
            let mut error = json!({
                "code": err.code_name(),
                "message": err.to_string(),
            });
            if let PackageError::Validation(v) = err {
                error["rule"] = json!(v.code_name());
            }
            json!({
                "ok": false,
                "exit_code": ExitCode::from_error(err).code_name(),
                "error": error,
            })
        }
    }
}
