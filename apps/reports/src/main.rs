//! # Downtown Reports CLI
//!
//! Prints one report as JSON on stdout. Failures print the report error as
//! JSON on stderr and exit with status 1.

use std::process::ExitCode;

use chrono::Local;
use tracing::{debug, info};

use downtown_db::Database;
use downtown_reports::cli::{self, Invocation, USAGE};
use downtown_reports::{logging, ReportError, ReportsConfig};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let (command, config_path, db_path) = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Invocation::Help) => {
            println!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        }
        Ok(Invocation::Run {
            command,
            config,
            db,
        }) => (command, config, db),
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!();
            eprintln!("{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    let mut config = match ReportsConfig::load(config_path) {
        Ok(config) => config,
        Err(err) => return fail(&ReportError::from(err), true),
    };
    if let Some(path) = db_path {
        config.database.path = path;
    }

    logging::init(&config.logging.filter);
    info!(
        db = %config.database.path.display(),
        command = ?command,
        "Running report"
    );

    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = match Database::new(config.db_config()).await {
        Ok(db) => db,
        Err(err) => return fail(&ReportError::from(err), config.reports.pretty),
    };

    let today = Local::now().date_naive();
    let result = cli::run(command, &db, today, config.reports.top_customers).await;
    db.close().await;

    match result {
        Ok(body) => {
            let text = if config.reports.pretty {
                serde_json::to_string_pretty(&body)?
            } else {
                serde_json::to_string(&body)?
            };
            println!("{text}");
            debug!("Report written");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail(&err, config.reports.pretty),
    }
}

fn fail(err: &ReportError, pretty: bool) -> anyhow::Result<ExitCode> {
    let text = if pretty {
        serde_json::to_string_pretty(err)?
    } else {
        serde_json::to_string(err)?
    };
    eprintln!("{text}");
    Ok(ExitCode::FAILURE)
}
