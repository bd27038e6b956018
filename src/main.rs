use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use kusa::{Cli, ExitStatus, GithubClient, Kusa, KusaError, SlackNotifier, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too, on stdout.
            let _ = e.print();
            return if e.use_stderr() {
                ExitStatus::ParseFlags.into()
            } else {
                ExitStatus::Ok.into()
            };
        }
    };

    logging::init(cli.debug);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            let err = KusaError::from(e);
            eprintln!("{err}");
            return err.exit_status().into();
        }
    };

    let today = config.today.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!(users = ?config.users, %today, "starting batch");

    let kusa = Kusa::new(
        GithubClient::new(config.github_url.as_str()),
        SlackNotifier::new(config.slack),
    );
    let report = kusa.run(&config.users, today).await;

    for entry in &report.reports {
        match &entry.outcome {
            Ok(stats) => println!(
                "{}: {} today, {} day streak (longest {}), {} this week, {} this year",
                entry.user,
                stats.latest_count,
                stats.current_streak,
                stats.longest_streak,
                stats.last_week_total,
                stats.year_total
            ),
            Err(e) => eprintln!("{}: {e}", entry.user),
        }
    }

    report.exit_status().into()
}
