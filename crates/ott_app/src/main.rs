mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use harvest_logging::{harvest_error, harvest_info, harvest_warn};
use ott_engine::{
    run_update_cycle, CycleOutcome, CycleReport, ReqwestFetcher, TableRowExtractor, UpdateConfig,
};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    logging::initialize(&config.logs_dir);

    harvest_info!("{}", "=".repeat(60));
    harvest_info!("Starting automated OTT dataset update");
    harvest_info!("{}", "=".repeat(60));

    let code = match run(&config).await {
        Ok(report) => {
            summarize(&report);
            ExitCode::from(exit_code(&report.outcome))
        }
        Err(err) => {
            harvest_error!("Update aborted before the cycle ran: {err:#}");
            ExitCode::FAILURE
        }
    };

    harvest_info!("{}", "=".repeat(60));
    harvest_info!("Automated update finished");
    harvest_info!("{}", "=".repeat(60));

    code
}

async fn run(config: &UpdateConfig) -> anyhow::Result<CycleReport> {
    let fetcher = ReqwestFetcher::new(config.fetch.clone());
    let extractor = TableRowExtractor::new(&config.table_selector)
        .with_context(|| format!("invalid table selector {:?}", config.table_selector))?;

    Ok(run_update_cycle(config, &fetcher, &extractor).await)
}

fn summarize(report: &CycleReport) {
    match &report.outcome {
        CycleOutcome::Success {
            new_records,
            total_records,
            archive,
        } => harvest_info!(
            "Outcome: success ({} new, {} total, archived to {:?})",
            new_records,
            total_records,
            archive
        ),
        CycleOutcome::Recovered {
            error,
            restored_from,
        } => harvest_warn!(
            "Outcome: failed ({}) but restored from {:?}",
            error,
            restored_from
        ),
        CycleOutcome::RestoreFailed {
            error,
            restore_error,
        } => harvest_error!(
            "Outcome: failed ({}) and the restore failed too ({})",
            error,
            restore_error
        ),
        CycleOutcome::NoBackupAvailable { error } => {
            harvest_error!("Outcome: failed ({}) with no backup to restore from", error)
        }
    }
}

/// Zero for success or a failure that was rolled back; non-zero only when
/// the dataset could not be put back into a known-good state.
fn exit_code(outcome: &CycleOutcome) -> u8 {
    match outcome {
        CycleOutcome::Success { .. } | CycleOutcome::Recovered { .. } => 0,
        CycleOutcome::RestoreFailed { .. } | CycleOutcome::NoBackupAvailable { .. } => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use ott_engine::{PersistError, UpdateError};

    fn cycle_error() -> UpdateError {
        UpdateError::CorruptDataset("unexpected trailing bytes".into())
    }

    #[test]
    fn success_and_recovered_failure_exit_zero() {
        let success = CycleOutcome::Success {
            new_records: 3,
            total_records: 3,
            archive: PathBuf::from("data/movies_backup_20260101_000000.json"),
        };
        let recovered = CycleOutcome::Recovered {
            error: cycle_error(),
            restored_from: PathBuf::from("data/movies_safety_20260101_000000.json"),
        };

        assert_eq!(exit_code(&success), 0);
        assert_eq!(exit_code(&recovered), 0);
    }

    #[test]
    fn irrecoverable_outcomes_exit_nonzero() {
        let restore_failed = CycleOutcome::RestoreFailed {
            error: cycle_error(),
            restore_error: PersistError::DataDir("data".into()),
        };
        let no_backup = CycleOutcome::NoBackupAvailable {
            error: cycle_error(),
        };

        assert_ne!(exit_code(&restore_failed), 0);
        assert_ne!(exit_code(&no_backup), 0);
    }
}
