//! CLI entry point for the campus dashboard core.
//!
//! Provides subcommands for building a teacher's weekly timetable grid and
//! grading a student's attendance, reading either a local JSON file or the
//! campus API.

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use campus_pulse::attendance::aggregate::from_payload;
use campus_pulse::attendance::grade::{percentage, tier};
use campus_pulse::attendance::types::{AttendanceEnvelope, SemesterKey};
use campus_pulse::config::Config;
use campus_pulse::error::CampusError;
use campus_pulse::fetch::BasicClient;
use campus_pulse::infra::campus::CampusClient;
use campus_pulse::output::{append_report, log_grid, print_json, round1};
use campus_pulse::schedule::catalog::{Catalog, Day};
use campus_pulse::schedule::grid;
use campus_pulse::schedule::metrics::ScheduleSummary;
use campus_pulse::schedule::parser::parse_sessions;
use campus_pulse::session::Role;
use campus_pulse::services::campus_api::CampusApi;
use campus_pulse::views::{
    AttendanceSnapshot, AttendanceView, GridSource, TimetableSnapshot, TimetableView,
};

#[derive(Parser)]
#[command(name = "campus_pulse")]
#[command(about = "Timetable grid and attendance analytics for the campus dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the weekly teaching grid and report load and the next session
    Timetable {
        /// JSON file with timetable entries; the campus API is used when omitted
        #[arg(short, long, value_name = "FILE")]
        source: Option<String>,

        /// Seed for the generated schedule used when no data is available
        #[arg(long)]
        seed: Option<u64>,

        /// Only display this day (Monday to Friday)
        #[arg(short, long, value_parser = parse_day)]
        day: Option<Day>,

        /// Reference time "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(long, value_parser = parse_instant)]
        at: Option<NaiveDateTime>,
    },
    /// Grade attendance per course for one semester
    Attendance {
        /// JSON file with an attendance response; the campus API is used when omitted
        #[arg(short, long, value_name = "FILE")]
        source: Option<String>,

        /// Semester to show, e.g. "Fall-2023" (defaults to the first one)
        #[arg(long)]
        semester: Option<SemesterKey>,

        /// CSV file to append the graded rows to
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn parse_day(s: &str) -> Result<Day, String> {
    Day::parse(s).ok_or_else(|| format!("'{s}' is not a weekday between Monday and Friday"))
}

fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let config = Config::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("campus_pulse.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Timetable {
            source,
            seed,
            day,
            at,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let now = at.unwrap_or_else(|| Local::now().naive_local());

            let snapshot = match source {
                Some(path) => timetable_from_file(&path, &mut rng)?,
                None => timetable_from_api(&config, &mut rng).await?,
            };

            log_grid(&snapshot.grid, day);
            let summary = ScheduleSummary::compute(&snapshot.grid, now);
            info!(
                source = ?snapshot.source,
                teaching_hours = summary.teaching_load,
                day = %summary.day,
                next_slot = summary.next_slot.as_deref().unwrap_or("none"),
                "Teaching schedule"
            );
            print_json(&summary)?;
        }
        Commands::Attendance {
            source,
            semester,
            output,
        } => {
            let snapshot = match source {
                Some(path) => attendance_from_file(&path)?,
                None => attendance_from_api(&config).await?,
            };

            let Some(key) = semester.as_ref().or_else(|| snapshot.default_key()).cloned() else {
                info!("No attendance records to show");
                return Ok(());
            };
            let records = snapshot.records(Some(&key));
            if records.is_empty() {
                warn!(semester = %key, "No records for this semester");
            }

            for record in records {
                let pct = percentage(record);
                info!(
                    course_id = %record.course_id,
                    course = %record.course_name,
                    faculty = %record.faculty,
                    total = record.total,
                    present = record.present,
                    duty_leave = record.duty_leave,
                    absent = record.absent,
                    medical = record.medical,
                    percentage = round1(pct),
                    tier = %tier(pct),
                    "Course attendance"
                );
            }

            let summary = snapshot.summary(Some(&key));
            info!(
                semester = %key,
                good = summary.good,
                warning = summary.warning,
                critical = summary.critical,
                "Attendance summary"
            );

            if let Some(path) = output.filter(|_| !records.is_empty()) {
                append_report(&path, &key, records)?;
                info!(path = %path, rows = records.len(), "Report appended");
            }
        }
    }

    Ok(())
}

/// Builds a grid from a local JSON array, or synthesizes one if the file is unusable.
#[tracing::instrument(skip(rng))]
fn timetable_from_file(path: &str, rng: &mut StdRng) -> Result<TimetableSnapshot> {
    let catalog = Catalog::standard();
    let records = std::fs::read(path)
        .with_context(|| format!("Failed to read {path}"))
        .and_then(|bytes| parse_sessions(&bytes));

    let snapshot = match records {
        Ok(records) => TimetableSnapshot {
            grid: grid::build(&catalog, Some(&records), rng),
            source: GridSource::Remote,
        },
        Err(e) => {
            warn!(error = %e, "Timetable file unusable, using generated schedule");
            TimetableSnapshot {
                grid: grid::synthesize(&catalog, rng),
                source: GridSource::Synthetic,
            }
        }
    };
    Ok(snapshot)
}

/// Loads the signed-in teacher's timetable through the campus API.
async fn timetable_from_api(config: &Config, rng: &mut StdRng) -> Result<TimetableSnapshot> {
    let identity = config.session().require_role(Role::Teacher)?;
    let token = identity
        .token
        .ok_or_else(|| CampusError::Unauthorized("no token in session".into()))?;
    let api = CampusClient::with_token(config.api_url.clone(), &token)?;

    let profile = TimetableView::profile(&api).await;
    info!(
        faculty_id = %profile.faculty_id,
        name = %profile.name,
        department = %profile.department,
        subjects = profile.subjects.len(),
        "Teacher profile"
    );

    let view = TimetableView::new(Catalog::standard());
    let snapshot = view
        .refresh(&api, rng)
        .await?
        .ok_or_else(|| anyhow!("timetable refresh was superseded"))?;
    Ok((*snapshot).clone())
}

fn attendance_from_file(path: &str) -> Result<AttendanceSnapshot> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {path}"))?;
    let envelope: AttendanceEnvelope = serde_json::from_slice(&bytes)?;
    let payload = envelope.into_result()?;
    Ok(AttendanceSnapshot {
        buckets: from_payload(&payload),
    })
}

/// Loads the signed-in student's attendance through the campus API.
async fn attendance_from_api(config: &Config) -> Result<AttendanceSnapshot> {
    let identity = config.session().require_role(Role::Student)?;
    let api: Box<dyn CampusApi> = match identity.token.as_deref() {
        Some(token) => Box::new(CampusClient::with_token(config.api_url.clone(), token)?),
        None => Box::new(CampusClient::new(
            config.api_url.clone(),
            BasicClient::with_timeouts()?,
        )),
    };

    let view = AttendanceView::new();
    let snapshot = view
        .refresh(api.as_ref(), &identity)
        .await?
        .ok_or_else(|| anyhow!("attendance refresh was superseded"))?;
    Ok((*snapshot).clone())
}
