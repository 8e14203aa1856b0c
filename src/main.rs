//! perftest-sweep - Main CLI Application
//!
//! Runs the RDMA perftest suite across power-of-two message sizes and prints
//! the figures each benchmark reports.

use clap::Parser;
use perftest_sweep::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, ValidationLevel},
    error::{AppError, ErrorReporter, Result},
    logging::Logger,
    models::RunConfig,
    output::ReporterFactory,
    runner::CommandRunner,
    sweep::{SweepDriver, SweepOutcome},
    BUILD_TIME, GIT_COMMIT, PKG_NAME, TARGET_TRIPLE, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(AppError::internal("panic").exit_code());
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(AppError::validation(message).exit_code());
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);
    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let list_only = cli.list;
    let config = load_config(cli)?;
    colored::control::set_override(config.enable_color);

    let logger = Logger::with_config(PKG_NAME, &config);
    if config.debug {
        eprintln!(
            "{} v{} (built {}, commit {}, {})",
            PKG_NAME, VERSION, BUILD_TIME, GIT_COMMIT, TARGET_TRIPLE
        );
        eprintln!("{}", display_config_summary(&config));
        eprintln!();
    }

    for warning in validate_config(&config)? {
        if warning.level == ValidationLevel::Warning || config.verbose || config.debug {
            eprintln!("{}", warning.format(config.enable_color));
        }
    }

    let runner = CommandRunner::from_config(&config, &logger);
    let reporter = ReporterFactory::create_stdout_reporter(config.output_format, config.enable_color);
    let mut driver = SweepDriver::new(config, runner, reporter)?.with_logger(logger.child("sweep"));

    if list_only {
        print_plan(&driver);
        return Ok(());
    }

    match driver.run().await? {
        SweepOutcome::Completed(summary) => {
            logger
                .debug("Exiting after complete sweep")
                .field("invocations", summary.invocations)
                .log();
        }
        SweepOutcome::ServerUnavailable { test, message_size, attempts } => {
            // Not an error: the peer was simply never started
            logger
                .info("Server unavailable, remaining runs skipped")
                .field("test", test)
                .field("message_size", message_size)
                .field("attempts", attempts)
                .log();
        }
    }

    Ok(())
}

/// Print every planned invocation, grouped by test
fn print_plan<R: perftest_sweep::output::SweepReporter>(driver: &SweepDriver<R>) {
    let config: &RunConfig = driver.config();
    let mut current: Option<String> = None;

    for run in driver.plan() {
        if current.as_deref() != Some(run.test.as_str()) {
            if current.is_some() {
                println!();
            }
            println!("{}:", run.test);
            current = Some(run.test.clone());
        }
        println!("  {}", run.invocation);
    }

    println!();
    println!(
        "{} tests x {} message sizes as {}",
        config.tests.len(),
        config.max_message_size_log2 + 1,
        config.role
    );
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file and PERFTEST_* variables");
            eprintln!("  - The client role needs --server-address");
            eprintln!("  - Run with --help for the supported variables");
        }
        AppError::Spawn(_) => {
            eprintln!();
            eprintln!("Launch troubleshooting:");
            eprintln!("  - Point --perftest-dir at the directory holding ib_read_bw and friends");
            eprintln!("  - Check that the binaries are executable");
        }
        _ => {}
    }
}
