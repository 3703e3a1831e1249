//! `tflens parse` command handler

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use tflens_core::config::TflensConfig;
use tflens_core::pipeline::{RunSummary, TracingReporter};
use tflens_core::types::{Level, LineError, Section, SectionKind};
use tflens_log_pipeline::{LogPipeline, LogPipelineBuilder, PipelineConfig, RunOutcome, SectionSummary};

use crate::cli::ParseArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, to_json_document};

/// Execute the `parse` command.
///
/// Writes the sections array to the resolved destination, then renders a
/// report. The report goes to stderr when stdout carries the sections.
pub async fn execute(
    args: ParseArgs,
    config: &TflensConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let pipeline = LogPipelineBuilder::new()
        .config(PipelineConfig::from_core(&config.parser))
        .build()?;

    let destination = args.destination();
    if let Some(path) = destination.as_deref() {
        ensure_not_input(&args.input, path).await?;
    }
    let pretty = config.output.pretty && !args.compact;

    info!(input = %args.input.display(), "parsing log file");

    let outcome = run_pipeline(pipeline, &args).await?;

    let report = match outcome {
        RunOutcome::Success(report) => report,
        RunOutcome::Failure { message } => {
            let empty: [Section; 0] = [];
            persist(destination.as_deref(), &to_json_document(&empty, pretty)?).await?;
            return Err(CliError::Parse(message));
        }
    };

    persist(destination.as_deref(), &to_json_document(&report.sections, pretty)?).await?;

    warn_line_errors(&report.errors);

    let summary = ParseReport {
        input: args.input.display().to_string(),
        output: destination.as_ref().map(|p| p.display().to_string()),
        summary: report.summary,
        sections: report.section_summaries(),
        errors: report.errors,
    };

    if destination.is_some() {
        writer.render(&summary)?;
    } else {
        writer.render_stderr(&summary)?;
    }

    if args.fail_on_line_errors && !summary.errors.is_empty() {
        return Err(CliError::LineErrors(summary.errors.len()));
    }

    Ok(())
}

/// Run the pipeline on a blocking thread.
async fn run_pipeline(pipeline: LogPipeline, args: &ParseArgs) -> Result<RunOutcome, CliError> {
    let input = args.input.clone();
    let reads_stdin = args.reads_stdin();

    tokio::task::spawn_blocking(move || -> Result<RunOutcome, CliError> {
        let reporter = TracingReporter::new();
        info!(run_id = %reporter.run_id(), "starting parse run");

        if reads_stdin {
            let stdin = std::io::stdin();
            Ok(pipeline.run_reader(stdin.lock(), &reporter))
        } else {
            let file = File::open(&input).map_err(|e| {
                CliError::Io(std::io::Error::new(
                    e.kind(),
                    format!("cannot open {}: {}", input.display(), e),
                ))
            })?;
            Ok(pipeline.run_reader(BufReader::new(file), &reporter))
        }
    })
    .await
    .map_err(|e| CliError::Command(format!("parse task failed: {}", e)))?
}

/// Refuse a destination that resolves to the input log itself.
async fn ensure_not_input(input: &Path, destination: &Path) -> Result<(), CliError> {
    let same = match (
        tokio::fs::canonicalize(input).await,
        tokio::fs::canonicalize(destination).await,
    ) {
        (Ok(input), Ok(destination)) => input == destination,
        _ => input == destination,
    };

    if same {
        return Err(CliError::Command(format!(
            "output {} is the input log; choose another path with -o",
            destination.display()
        )));
    }
    Ok(())
}

/// Write the JSON document to a file, or stdout when no path is given.
async fn persist(destination: Option<&Path>, document: &[u8]) -> Result<(), CliError> {
    match destination {
        Some(path) => {
            tokio::fs::write(path, document).await?;
            info!(path = %path.display(), bytes = document.len(), "sections written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(document)?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn warn_line_errors(errors: &[LineError]) {
    use colored::Colorize;

    for error in errors {
        eprintln!("{} {}", "warning:".yellow().bold(), error);
    }
}

/// Parse command report.
#[derive(Serialize)]
pub struct ParseReport {
    /// Input path (`-` for stdin)
    pub input: String,
    /// Sections file, `None` when written to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Run counters
    pub summary: RunSummary,
    /// Per-section summaries
    pub sections: Vec<SectionSummary>,
    /// Skipped lines
    pub errors: Vec<LineError>,
}

impl ParseReport {
    /// Destination shown in the header line.
    fn output_label(&self) -> &str {
        self.output.as_deref().unwrap_or("stdout")
    }
}

const LEVEL_COLUMNS: [Level; 7] = [
    Level::Fatal,
    Level::Error,
    Level::Warn,
    Level::Info,
    Level::Debug,
    Level::Trace,
    Level::Unknown,
];

impl Render for ParseReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Parsed {} -> {}",
            self.input.bold(),
            self.output_label().bold()
        )?;
        writeln!(
            w,
            "  lines: {}  records: {}  sections: {}  dropped: {}  line errors: {}",
            self.summary.lines,
            self.summary.records,
            self.summary.sections,
            self.summary.dropped,
            if self.summary.line_errors > 0 {
                self.summary.line_errors.to_string().red().to_string()
            } else {
                self.summary.line_errors.to_string()
            }
        )?;

        if self.sections.is_empty() {
            writeln!(w, "  No plan/apply sections found.")?;
            return Ok(());
        }

        writeln!(w)?;
        write!(w, "{:<4} {:<8} {:>8} {:>10}", "#", "TYPE", "RECORDS", "DURATION")?;
        for level in LEVEL_COLUMNS {
            write!(w, " {:>7}", level.as_str().to_uppercase())?;
        }
        writeln!(w)?;
        writeln!(w, "{}", "-".repeat(33 + 8 * LEVEL_COLUMNS.len()))?;

        for (idx, section) in self.sections.iter().enumerate() {
            let padded = format!("{:<8}", section.kind.as_str());
            let kind = match section.kind {
                SectionKind::Plan => padded.cyan().to_string(),
                SectionKind::Apply => padded.green().to_string(),
                SectionKind::Unknown => padded,
            };
            write!(
                w,
                "{:<4} {} {:>8} {:>10}",
                idx + 1,
                kind,
                section.records,
                format_duration(section.duration_ms)
            )?;
            for level in LEVEL_COLUMNS {
                write!(w, " {:>7}", section.count(level))?;
            }
            writeln!(w)?;
        }

        Ok(())
    }
}

fn format_duration(duration_ms: Option<i64>) -> String {
    match duration_ms {
        Some(ms) if ms.abs() >= 1000 => format!("{:.1}s", ms as f64 / 1000.0),
        Some(ms) => format!("{}ms", ms),
        None => "-".to_owned(),
    }
}
