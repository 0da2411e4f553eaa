// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use cargo_alloc_model::prelude::{DelimitedTableReader, Diagnostics};
use cargo_alloc_solver::prelude::{
    AllocationOutcome, AllocationPipeline, AllocationReport, PipelineConfig, PipelineError,
    RunStats,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::{Duration, Instant},
};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

#[derive(Parser, Debug)]
#[command(name = "cargo-alloc")]
#[command(version)]
#[command(about = "Allocates cargo tonnage across direct and connecting routes to maximise contribution margin")]
struct Args {
    /// Direct-route table (CSV or TSV).
    #[arg(long)]
    direct: PathBuf,

    /// Indirect (two-leg) route table (CSV or TSV).
    #[arg(long)]
    indirect: Option<PathBuf>,

    /// JSON file with pipeline settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the JSON run record is written.
    #[arg(short, long, default_value = "allocation_report.json")]
    output: PathBuf,

    /// Solver time limit in seconds; overrides the config file.
    #[arg(long)]
    time_limit_secs: Option<u64>,

    /// Cell delimiter; sniffed from the header line when omitted.
    #[arg(long)]
    delimiter: Option<char>,
}

#[derive(Debug)]
enum CliError {
    Io(PathBuf, std::io::Error),
    Config(PathBuf, serde_json::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(p, e) => write!(f, "{}: {e}", p.display()),
            CliError::Config(p, e) => write!(f, "invalid config {}: {e}", p.display()),
            CliError::Serialize(e) => write!(f, "could not serialize run record: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RunStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Serialize)]
struct RunRecord {
    direct_file: String,
    indirect_file: Option<String>,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    status: RunStatus,
    config: PipelineConfig,
    stats: Option<RunStats>,
    report: Option<AllocationReport>,
    error: Option<String>,
    diagnostics: Diagnostics,
}

impl RunRecord {
    fn new(
        args: &Args,
        config: PipelineConfig,
        start_ts: DateTime<Utc>,
        runtime: Duration,
        result: Result<AllocationOutcome, PipelineError>,
    ) -> Self {
        let (status, stats, report, error, diagnostics) = match result {
            Ok(out) => (
                RunStatus::Succeeded,
                Some(out.stats),
                Some(out.report.to_display(config.display_precision)),
                None,
                out.diagnostics,
            ),
            Err(e) => {
                let msg = e.to_string();
                let (_, diagnostics) = e.into_parts();
                (RunStatus::Failed, None, None, Some(msg), diagnostics)
            }
        };
        Self {
            direct_file: args.direct.display().to_string(),
            indirect_file: args.indirect.as_ref().map(|p| p.display().to_string()),
            start_ts,
            end_ts: Utc::now(),
            runtime_ms: runtime.as_millis(),
            status,
            config,
            stats,
            report,
            error,
            diagnostics,
        }
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT | FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<PipelineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| CliError::Io(path.clone(), e))?;
            serde_json::from_str(&text).map_err(|e| CliError::Config(path.clone(), e))?
        }
        None => PipelineConfig::default(),
    };
    if let Some(secs) = args.time_limit_secs {
        config = config.with_time_limit(Duration::from_secs(secs));
    }
    Ok(config)
}

fn write_record(path: &Path, record: &RunRecord) -> Result<(), CliError> {
    let file = File::create(path).map_err(|e| CliError::Io(path.to_path_buf(), e))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, record).map_err(CliError::Serialize)?;
    w.write_all(b"\n")
        .and_then(|_| w.flush())
        .map_err(|e| CliError::Io(path.to_path_buf(), e))
}

fn run(args: &Args) -> Result<RunStatus, CliError> {
    let config = load_config(args)?;
    let reader = match args.delimiter {
        Some(d) => DelimitedTableReader::new().delimiter(d),
        None => DelimitedTableReader::new(),
    };

    tracing::info!(
        direct = %args.direct.display(),
        indirect = ?args.indirect.as_ref().map(|p| p.display().to_string()),
        "starting allocation"
    );

    let start_ts = Utc::now();
    let t0 = Instant::now();
    let result = AllocationPipeline::new(config).run_paths(&reader, &args.direct, args.indirect.as_ref());
    let runtime = t0.elapsed();

    if let Err(e) = &result {
        tracing::error!("{e}");
    }

    let record = RunRecord::new(args, config, start_ts, runtime, result);
    write_record(&args.output, &record)?;
    tracing::info!(
        status = ?record.status,
        runtime_ms = record.runtime_ms as u64,
        "wrote run record to {}",
        args.output.display()
    );
    Ok(record.status)
}

fn main() -> ExitCode {
    enable_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(RunStatus::Succeeded) => ExitCode::SUCCESS,
        Ok(RunStatus::Failed) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(2)
        }
    }
}
