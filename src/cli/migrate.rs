use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error, info,
    migration::Migrator,
    success,
    types::{MigrationReport, MigrationResponse},
    utils, warning,
};

pub async fn migrate(json: bool) {
    // stdout carries nothing but the JSON document
    crate::status_to_stderr(json);

    let migrator = match Migrator::from_env().await {
        Ok(m) => m,
        Err(e) => error!("Cannot start migration. Err: {}", e),
    };

    info!("Resolving Deezer tracks on Spotify...");

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let report = match migrator.with_progress(pb).run().await {
        Ok(report) => report,
        Err(e) => error!("Migration failed: {}", e),
    };

    if json {
        print_json(report);
    } else {
        print_report(&report);
    }
}

fn print_report(report: &MigrationReport) {
    success!("{}", report.message);

    if report.errors.is_empty() {
        return;
    }

    warning!(
        "{} tracks could not be matched on Spotify:",
        report.errors.total()
    );
    let table = Table::new(utils::error_table_rows(&report.errors));
    println!("{}", table);
}

fn print_json(report: MigrationReport) {
    let response = MigrationResponse {
        message: report.message,
        errors: Some(report.errors),
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Cannot serialize migration report. Err: {}", e),
    }
}
