//! # Command Line
//!
//! Hand-rolled argument loop and the command dispatcher.
//!
//! ## Usage
//! ```bash
//! downtown-reports wages
//! downtown-reports monthly-wages --year 2025 --month 3
//! downtown-reports top-customers -n 10
//! downtown-reports labours --skip 10 --limit 10
//! downtown-reports stats --db ./downtown_dev.db --config ./reports.toml
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use downtown_core::{PageRequest, DEFAULT_PAGE_SIZE};
use downtown_db::Database;

use crate::error::{ReportError, ReportResult};
use crate::services::{LabourService, PriceService, StatsService, WageService};

pub const USAGE: &str = "\
Downtown Reports

Usage: downtown-reports <COMMAND> [OPTIONS]

Commands:
  wages                   Lifetime wages per staff member by labour type
  monthly-wages           Wage per roster entry for the current month
  stats                   Grand totals across every collection
  monthly-kg              Invoice kg per month of the current year
  monthly-sales           Direct sales per month of the current year
  monthly-process-sales   Completed invoice amount per month of the current year
  process-types           Completed invoices per process combination
  recyclers               Monthly kg of recycler A against recycler B
  top-customers           Customers ranked by completed invoice amount
  labours                 Labour records of the current month, newest first
  prices                  Current price settings

Options:
  -c, --config <PATH>     Config file (default: platform config dir)
  -d, --db <PATH>         Database file, overrides the config
      --year <YYYY>       monthly-wages: year of the month to report
      --month <M>         monthly-wages: month to report (1-12)
  -n, --top <N>           top-customers: how many to keep
      --skip <N>          labours: records to skip (default: 0)
      --limit <N>         labours: page size (default: 10)
  -h, --help              Show this help message";

/// A report to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Wages,
    MonthlyWages { year: Option<i32>, month: Option<u32> },
    Stats,
    MonthlyKg,
    MonthlySales,
    MonthlyProcessSales,
    ProcessTypes,
    Recyclers,
    TopCustomers { n: Option<usize> },
    Labours { page: PageRequest },
    Prices,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Help,
    Run {
        command: Command,
        config: Option<PathBuf>,
        db: Option<PathBuf>,
    },
}

/// Parses arguments, without the program name.
pub fn parse_args<I>(args: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();

    let mut name: Option<String> = None;
    let mut config = None;
    let mut db = None;
    let mut year = None;
    let mut month = None;
    let mut top = None;
    let mut skip = 0_u32;
    let mut limit = DEFAULT_PAGE_SIZE;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => return Ok(Invocation::Help),
            "--config" | "-c" => config = Some(PathBuf::from(value(&args, i, flag)?)),
            "--db" | "-d" => db = Some(PathBuf::from(value(&args, i, flag)?)),
            "--year" => year = Some(number(&args, i, flag)?),
            "--month" => month = Some(number(&args, i, flag)?),
            "--top" | "-n" => top = Some(number(&args, i, flag)?),
            "--skip" => skip = number(&args, i, flag)?,
            "--limit" => limit = number(&args, i, flag)?,
            other if other.starts_with('-') => return Err(format!("unknown option '{other}'")),
            other => {
                if let Some(first) = &name {
                    return Err(format!("unexpected argument '{other}' after '{first}'"));
                }
                name = Some(other.to_string());
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    let Some(name) = name else {
        return Err("no command given".to_string());
    };

    let command = match name.as_str() {
        "wages" => Command::Wages,
        "monthly-wages" => {
            if year.is_some() != month.is_some() {
                return Err("--year and --month must be given together".to_string());
            }
            Command::MonthlyWages { year, month }
        }
        "stats" => Command::Stats,
        "monthly-kg" => Command::MonthlyKg,
        "monthly-sales" => Command::MonthlySales,
        "monthly-process-sales" => Command::MonthlyProcessSales,
        "process-types" => Command::ProcessTypes,
        "recyclers" => Command::Recyclers,
        "top-customers" => Command::TopCustomers { n: top },
        "labours" => Command::Labours {
            page: PageRequest::new(skip, limit),
        },
        "prices" => Command::Prices,
        other => return Err(format!("unknown command '{other}'")),
    };

    Ok(Invocation::Run {
        command,
        config,
        db,
    })
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = value(args, i, flag)?;
    raw.trim()
        .parse()
        .map_err(|_| format!("{flag} expects a number, got '{raw}'"))
}

/// Runs one report and returns its JSON body.
pub async fn run(
    command: Command,
    db: &Database,
    today: NaiveDate,
    default_top: usize,
) -> ReportResult<Value> {
    match command {
        Command::Wages => to_value(WageService::new(db.clone()).wages_by_type().await?),
        Command::MonthlyWages { year, month } => {
            let wages = WageService::new(db.clone());
            let summaries = match (year, month) {
                (Some(year), Some(month)) => wages.monthly_wages_for(year, month).await?,
                _ => wages.monthly_wages(today).await?,
            };
            to_value(summaries)
        }
        Command::Stats => to_value(StatsService::new(db.clone()).grand_totals().await?),
        Command::MonthlyKg => to_value(StatsService::new(db.clone()).monthly_kg(today).await?),
        Command::MonthlySales => {
            to_value(StatsService::new(db.clone()).monthly_sales(today).await?)
        }
        Command::MonthlyProcessSales => to_value(
            StatsService::new(db.clone())
                .monthly_process_sales(today)
                .await?,
        ),
        Command::ProcessTypes => to_value(StatsService::new(db.clone()).process_types().await?),
        Command::Recyclers => to_value(StatsService::new(db.clone()).recyclers().await?),
        Command::TopCustomers { n } => to_value(
            StatsService::new(db.clone())
                .top_customers(n.unwrap_or(default_top))
                .await?,
        ),
        Command::Labours { page } => to_value(
            LabourService::new(db.clone())
                .current_month(today, page)
                .await?,
        ),
        Command::Prices => to_value(PriceService::new(db.clone()).get().await?),
    }
}

fn to_value<T: Serialize>(body: T) -> ReportResult<Value> {
    serde_json::to_value(body)
        .map_err(|e| ReportError::internal(format!("Failed to encode report: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures;

    fn parse(args: &[&str]) -> Result<Invocation, String> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    fn command(args: &[&str]) -> Command {
        match parse(args).unwrap() {
            Invocation::Run { command, .. } => command,
            Invocation::Help => panic!("expected a command"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(command(&["wages"]), Command::Wages);
        assert_eq!(command(&["recyclers"]), Command::Recyclers);
        assert_eq!(
            command(&["top-customers", "-n", "3"]),
            Command::TopCustomers { n: Some(3) }
        );
        assert_eq!(
            command(&["monthly-wages", "--year", "2025", "--month", "2"]),
            Command::MonthlyWages {
                year: Some(2025),
                month: Some(2)
            }
        );
        assert_eq!(
            command(&["labours", "--skip", "20", "--limit", "500"]),
            Command::Labours {
                page: PageRequest::new(20, 100)
            }
        );
    }

    #[test]
    fn test_parse_paths_and_help() {
        let parsed = parse(&["--db", "/tmp/d.db", "stats", "-c", "r.toml"]).unwrap();
        assert_eq!(
            parsed,
            Invocation::Run {
                command: Command::Stats,
                config: Some(PathBuf::from("r.toml")),
                db: Some(PathBuf::from("/tmp/d.db")),
            }
        );
        assert_eq!(parse(&["stats", "--help"]).unwrap(), Invocation::Help);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["payroll"]).is_err());
        assert!(parse(&["stats", "wages"]).is_err());
        assert!(parse(&["stats", "--verbose"]).is_err());
        assert!(parse(&["top-customers", "-n"]).is_err());
        assert!(parse(&["top-customers", "-n", "many"]).is_err());
        assert!(parse(&["monthly-wages", "--year", "2025"]).is_err());
    }

    #[tokio::test]
    async fn test_run_returns_json_bodies() {
        let db = fixtures::database().await;
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let body = run(Command::ProcessTypes, &db, today, 5).await.unwrap();
        assert_eq!(body["labels"].as_array().map(Vec::len), Some(7));

        let body = run(
            Command::Labours {
                page: PageRequest::default(),
            },
            &db,
            today,
            5,
        )
        .await
        .unwrap();
        assert_eq!(body["total"], 0);
        assert!(body["records"].as_array().is_some_and(Vec::is_empty));

        let err = run(Command::Prices, &db, today, 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
