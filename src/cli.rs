//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvSnapshotAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::assembler::RecordLookup;
use crate::domain::catalog::DateSpan;
use crate::domain::config_validation::build_database_settings;
use crate::domain::database::Database;
use crate::domain::error::SnapdbError;
use crate::domain::naming::parse_compact_date;
use crate::domain::transaction::TransactionRow;
use crate::ports::config_port::ConfigPort;

/// Exit code for a query naming an instrument the database has never seen.
pub const UNKNOWN_INSTRUMENT_EXIT: u8 = 6;

#[derive(Parser, Debug)]
#[command(name = "snapdb", about = "Query folders of daily CSV snapshot files")]
pub struct Cli {
    /// INI file with [database] name/path and [record] settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Database name (filename prefix); overrides the config file
    #[arg(long, global = true)]
    pub name: Option<String>,
    /// Snapshot folder; overrides the config file
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the snapshot files belonging to the database
    Files,
    /// Show file count, first and last file
    Report,
    /// Resolve a date or date range to snapshot filenames
    Range {
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,
    },
    /// List distinct instrument ids
    Instruments {
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg, requires = "start")]
        end: Option<NaiveDate>,
    },
    /// Write one instrument's transaction history as CSV
    Record {
        #[arg(short, long)]
        instrument: String,
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg, requires = "start")]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip files whose name carries no valid date instead of failing
        #[arg(long)]
        skip_bad_dates: bool,
    },
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_compact_date(value).map_err(|e| e.to_string())
}

fn span(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<DateSpan> {
    start.map(|start| DateSpan { start, end })
}

/// Config file values with command-line flags layered on top.
pub struct CliConfig {
    file: Option<FileConfigAdapter>,
    name: Option<String>,
    path: Option<String>,
    skip_bad_dates: bool,
}

impl CliConfig {
    pub fn new(file: Option<FileConfigAdapter>) -> Self {
        Self {
            file,
            name: None,
            path: None,
            skip_bad_dates: false,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, SnapdbError> {
        let file = match &cli.config {
            Some(path) => Some(load_config(path)?),
            None => None,
        };
        let mut config = Self::new(file);
        config.name = cli.name.clone();
        config.path = cli.path.as_deref().map(path_flag).transpose()?;
        config.skip_bad_dates = matches!(
            cli.command,
            Command::Record {
                skip_bad_dates: true,
                ..
            }
        );
        Ok(config)
    }
}

impl ConfigPort for CliConfig {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        let flag = match (section, key) {
            ("database", "name") => self.name.clone(),
            ("database", "path") => self.path.clone(),
            _ => None,
        };
        flag.or_else(|| self.file.as_ref().and_then(|f| f.get_string(section, key)))
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        if (section, key) == ("record", "skip_bad_file_dates") && self.skip_bad_dates {
            return true;
        }
        self.file
            .as_ref()
            .map(|f| f.get_bool(section, key, default))
            .unwrap_or(default)
    }
}

fn path_flag(path: &Path) -> Result<String, SnapdbError> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| SnapdbError::ConfigInvalid {
            section: "database".to_string(),
            key: "path".to_string(),
            reason: format!("{} is not valid UTF-8", path.display()),
        })
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, SnapdbError> {
    FileConfigAdapter::from_file(path).map_err(|e| SnapdbError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn open_database(config: &dyn ConfigPort) -> Result<Database<CsvSnapshotAdapter>, SnapdbError> {
    let settings = build_database_settings(config)?;
    log::info!(
        "opening database {} at {}",
        settings.name,
        settings.path.display()
    );
    Ok(Database::open(settings.name, settings.path).with_file_date_policy(settings.file_date_policy))
}

pub fn run(cli: Cli) -> ExitCode {
    let db = match CliConfig::from_cli(&cli).and_then(|config| open_database(&config)) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match execute(&db, &cli.command, &mut out) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Run one command against `db`, writing data to `out` and diagnostics to stderr.
pub fn execute<W: Write>(
    db: &Database<CsvSnapshotAdapter>,
    command: &Command,
    out: &mut W,
) -> Result<ExitCode, SnapdbError> {
    match command {
        Command::Files => {
            let files = db.list_files()?;
            write_lines(out, &files)?;
            eprintln!("{} files in {}", files.len(), db.name());
            Ok(ExitCode::SUCCESS)
        }
        Command::Report => {
            let report = db.folder_report()?;
            writeln!(out, "{report}")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Range { start, end } => {
            let files = db.resolve_date_range(*start, *end)?;
            write_lines(out, &files)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Instruments { start, end } => {
            let instruments = db.list_instruments(span(*start, *end))?;
            write_lines(out, &instruments)?;
            eprintln!("{} instruments found", instruments.len());
            Ok(ExitCode::SUCCESS)
        }
        Command::Record {
            instrument,
            start,
            end,
            output,
            ..
        } => run_record(db, instrument, span(*start, *end), output.as_ref(), out),
    }
}

fn run_record<W: Write>(
    db: &Database<CsvSnapshotAdapter>,
    instrument: &str,
    span: Option<DateSpan>,
    output: Option<&PathBuf>,
    out: &mut W,
) -> Result<ExitCode, SnapdbError> {
    let stream = match db.stream_record(instrument, span)? {
        RecordLookup::Found(stream) => stream,
        RecordLookup::Unknown { instrument_id } => {
            eprintln!(
                "instrument {} does not exist in database {}",
                instrument_id,
                db.name()
            );
            return Ok(ExitCode::from(UNKNOWN_INSTRUMENT_EXIT));
        }
    };

    let written = match output {
        Some(path) => {
            let file = File::create(path)?;
            let count = write_records(file, stream, path.display().to_string())?;
            eprintln!("{} rows written to {}", count, path.display());
            count
        }
        None => write_records(&mut *out, stream, "<stdout>".to_string())?,
    };
    if written == 0 {
        eprintln!("no rows for {} in the selected files", instrument);
    }
    Ok(ExitCode::SUCCESS)
}

fn write_records<W: Write>(
    sink: W,
    rows: impl Iterator<Item = Result<TransactionRow, SnapdbError>>,
    target: String,
) -> Result<usize, SnapdbError> {
    let csv_err = |e: csv::Error| SnapdbError::Csv {
        file: target.clone(),
        reason: e.to_string(),
    };
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(TransactionRow::header()).map_err(csv_err)?;
    let mut count = 0;
    for row in rows {
        writer.write_record(row?.to_fields()).map_err(csv_err)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
