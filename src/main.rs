mod commands;

use change_order::config::AppConfig;
use change_order::error::AppError;
use change_order::telemetry;
use change_order::workflows::change_order::{
    Case, GuidanceContext, Permissions, Role, TrackEvent, TrackKind,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "change-order",
    about = "Evaluate change-order case snapshots: status, outcomes, guidance, and event payloads",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the derived case status and the status of every track
    Status(CaseArgs),
    /// Evaluate the recorded response on one track
    Evaluate(TrackArgs),
    /// Select the guidance message for a role
    Guidance(GuidanceArgs),
    /// Build the response event payload for one track
    Payload(PayloadArgs),
    /// Apply a track event and print the resulting snapshot
    Apply(ApplyArgs),
}

#[derive(Args, Debug)]
struct CaseArgs {
    /// Case snapshot (JSON)
    #[arg(long)]
    case: PathBuf,
}

#[derive(Args, Debug)]
struct TrackArgs {
    /// Case snapshot (JSON)
    #[arg(long)]
    case: PathBuf,
    /// Track to evaluate
    #[arg(long, value_enum)]
    track: TrackArg,
}

#[derive(Args, Debug)]
struct GuidanceArgs {
    /// Case snapshot (JSON)
    #[arg(long)]
    case: PathBuf,
    /// Role the guidance is selected for
    #[arg(long, value_enum)]
    role: RoleArg,
    /// Permissions (JSON). Defaults to the capabilities derived from the snapshot.
    #[arg(long)]
    permissions: Option<PathBuf>,
    /// Guidance context (JSON) with escalation and final-order flags
    #[arg(long)]
    context: Option<PathBuf>,
    /// Override the context's reference date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct PayloadArgs {
    /// Case snapshot (JSON) with the response recorded on the track
    #[arg(long)]
    case: PathBuf,
    /// Track whose response is turned into an event payload
    #[arg(long, value_enum)]
    track: TrackArg,
    /// Justification edited by the user. Omit to generate one from the totals.
    #[arg(long)]
    justification: Option<String>,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Case snapshot (JSON)
    #[arg(long)]
    case: PathBuf,
    /// Track event (JSON), e.g. {"event": "send", "track": "grounds"}
    #[arg(long)]
    event: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TrackArg {
    Grounds,
    Compensation,
    TimeExtension,
}

impl From<TrackArg> for TrackKind {
    fn from(value: TrackArg) -> Self {
        match value {
            TrackArg::Grounds => TrackKind::Grounds,
            TrackArg::Compensation => TrackKind::Compensation,
            TrackArg::TimeExtension => TrackKind::TimeExtension,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Claimant,
    Respondent,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Claimant => Role::Claimant,
            RoleArg::Respondent => Role::Respondent,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(?config.environment, "change-order cli ready");

    let pretty = config.output.pretty;
    match cli.command {
        Command::Status(args) => {
            let case: Case = commands::read_json(&args.case)?;
            emit(&commands::status(&case), pretty)
        }
        Command::Evaluate(args) => {
            let case: Case = commands::read_json(&args.case)?;
            emit(&commands::evaluate(&case, args.track.into())?, pretty)
        }
        Command::Guidance(args) => run_guidance(args, pretty),
        Command::Payload(args) => {
            let case: Case = commands::read_json(&args.case)?;
            let payload = commands::payload(&case, args.track.into(), args.justification)?;
            emit(&payload, pretty)
        }
        Command::Apply(args) => {
            let case: Case = commands::read_json(&args.case)?;
            let event: TrackEvent = commands::read_json(&args.event)?;
            emit(&commands::apply_event(&case, event)?, pretty)
        }
    }
}

fn run_guidance(args: GuidanceArgs, pretty: bool) -> Result<(), AppError> {
    let case: Case = commands::read_json(&args.case)?;
    let permissions = args
        .permissions
        .as_deref()
        .map(commands::read_json::<Permissions>)
        .transpose()?;
    let mut context = args
        .context
        .as_deref()
        .map(commands::read_json::<GuidanceContext>)
        .transpose()?
        .unwrap_or_default();
    if args.today.is_some() {
        context.today = args.today;
    }

    let report = commands::guidance(&case, args.role.into(), permissions, &context);
    emit(&report, pretty)
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<(), AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date(" 2025-06-02 "),
            Ok(NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"))
        );
        assert!(parse_date("02.06.2025").is_err());
    }

    #[test]
    fn track_flag_uses_kebab_case_names() {
        let cli = Cli::try_parse_from([
            "change-order",
            "evaluate",
            "--case",
            "case.json",
            "--track",
            "time-extension",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(TrackKind::from(args.track), TrackKind::TimeExtension)
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }
}
