//! CLI command for replaying a session script
//!
//! Runs a scripted session through the core, prints what the user would have
//! seen (notifications and reports) and optionally exports the result.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::display::{format_goal_table, format_progression, format_transaction_table};
use crate::error::{FinanceError, FinanceResult};
use crate::export::{
    export_goals_csv, export_session_json, export_session_yaml, export_transactions_csv,
    ExportFormat,
};
use crate::reports::{OverviewReport, SpendingReport};
use crate::script::{replay, ReplayResult, SessionScript};
use crate::services::{EntropyTipSource, SeededTipSource, TipSource};
use crate::session::Session;

/// Which report to print after the replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Overview,
    Spending,
    Transactions,
    Goals,
    Achievements,
    All,
    None,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Session script (YAML or JSON)
    pub script: PathBuf,

    /// Report to print
    #[arg(short, long, value_enum, default_value = "overview")]
    pub report: ReportKind,

    /// Export the resulting session (json, yaml or csv)
    ///
    /// CSV holds the spending breakdown with `--report spending`, the goals
    /// with `--report goals`, and the transactions otherwise.
    #[arg(short, long)]
    pub export: Option<ExportFormat>,

    /// Export destination (defaults to stdout)
    #[arg(short, long, requires = "export")]
    pub output: Option<PathBuf>,

    /// Seed for the tip of the day
    #[arg(long)]
    pub seed: Option<u64>,

    /// Date of the first action when the script has no start_date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Do not print notifications
    #[arg(short, long)]
    pub quiet: bool,

    /// Fail when any action is rejected
    #[arg(long)]
    pub strict: bool,
}

/// Handle the replay command
pub fn handle_replay_command(
    settings: Settings,
    args: ReplayArgs,
    today: NaiveDate,
) -> FinanceResult<()> {
    let script = SessionScript::load(&args.script)?;
    let result = replay(&script, settings, args.start.unwrap_or(today));

    // Exporting to stdout keeps the stream machine-readable
    let export_to_stdout = args.export.is_some() && args.output.is_none();

    if !export_to_stdout {
        print_outcome(&result, args.quiet);

        if let Some(text) = render_report(&result.session, args.report) {
            print!("{}", text);
        }

        if args.report != ReportKind::None {
            let mut source: Box<dyn TipSource> = match args.seed {
                Some(seed) => Box::new(SeededTipSource::new(seed)),
                None => Box::new(EntropyTipSource),
            };
            println!();
            println!("Dica: {}", result.session.insights().daily_tip(source.as_mut()));
            for rec in result.session.insights().recommendations() {
                println!("  - {}", rec);
            }
        }
    }

    if let Some(format) = args.export {
        match &args.output {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    FinanceError::Export(format!("Failed to create {}: {}", path.display(), e))
                })?;
                let mut writer = BufWriter::new(file);
                write_export(&result.session, format, args.report, &mut writer)?;
                writer.flush()?;
                println!("Exported session ({}) to: {}", format, path.display());
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                write_export(&result.session, format, args.report, &mut writer)?;
            }
        }
    }

    if args.strict && result.errors() > 0 {
        return Err(FinanceError::Validation(format!(
            "{} of {} action(s) failed",
            result.errors(),
            script.actions.len()
        )));
    }

    Ok(())
}

fn print_outcome(result: &ReplayResult, quiet: bool) {
    if !quiet {
        for event in &result.events {
            println!("{}", event.to_notification());
        }
    }

    for (number, message) in &result.error_messages {
        println!("[x] Action {}: {}", number, message);
    }

    if !quiet || result.errors() > 0 {
        println!(
            "Applied {} action(s), {} failed.\n",
            result.applied,
            result.errors()
        );
    }
}

/// Render the selected report(s) for a session
pub fn render_report(session: &Session, kind: ReportKind) -> Option<String> {
    let settings = session.settings();
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    let text = match kind {
        ReportKind::None => return None,
        ReportKind::Overview => OverviewReport::generate(session).format_terminal(),
        ReportKind::Spending => SpendingReport::generate(session.ledger(), symbol).format_terminal(),
        ReportKind::Transactions => {
            format_transaction_table(session.ledger().transactions(), symbol, date_format)
        }
        ReportKind::Goals => {
            format_goal_table(session.goals().goals(), session.today(), symbol, date_format)
        }
        ReportKind::Achievements => format_progression(session.progression(), date_format),
        ReportKind::All => [
            ReportKind::Overview,
            ReportKind::Spending,
            ReportKind::Transactions,
            ReportKind::Goals,
            ReportKind::Achievements,
        ]
        .into_iter()
        .filter_map(|k| render_report(session, k))
        .collect::<Vec<_>>()
        .join("\n"),
    };

    Some(text)
}

fn write_export<W: Write>(
    session: &Session,
    format: ExportFormat,
    report: ReportKind,
    writer: &mut W,
) -> FinanceResult<()> {
    match (format, report) {
        (ExportFormat::Json, _) => export_session_json(session, writer, true),
        (ExportFormat::Yaml, _) => export_session_yaml(session, writer),
        (ExportFormat::Csv, ReportKind::Spending) => {
            SpendingReport::generate(session.ledger(), &session.settings().currency_symbol)
                .export_csv(writer)
        }
        (ExportFormat::Csv, ReportKind::Goals) => export_goals_csv(session.goals().goals(), writer),
        (ExportFormat::Csv, _) => export_transactions_csv(session.ledger().transactions(), writer),
    }
}
