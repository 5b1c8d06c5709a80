//! WireMock stub import CLI
//!
//! Runs the same lifecycle a load-test scheduler would: before-test setup
//! followed by one custom event, then prints what was uploaded where.
//!
//! Usage:
//!   wiremock-event --files-dir ./stubs --url http://localhost:8080 --settings "delay=500"

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use wiremock_event::config::{WIREMOCK_FILES_DIR, WIREMOCK_TIMEOUT_MS, WIREMOCK_URL};
use wiremock_event::{
    logging, CustomEvent, EventOutcome, EventProperties, ImportReport, LoggingConfig, SkipReason,
    TestContext, TestLifecycleListener, WiremockEvent, CHANGE_DELAY_EVENT,
};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Upload templated stub mappings to one or more WireMock servers
#[derive(Parser, Debug)]
#[command(name = "wiremock-event")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the stub-definition files
    #[arg(short, long, env = "WIREMOCK_FILES_DIR")]
    files_dir: Option<PathBuf>,

    /// WireMock base URL(s), comma-separated
    #[arg(short, long, env = "WIREMOCK_URL")]
    url: Option<String>,

    /// YAML file with event properties (command-line values take precedence)
    #[arg(short, long)]
    properties: Option<PathBuf>,

    /// Upload timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Test run id reported in the logs
    #[arg(long, default_value = "manual")]
    test_run_id: String,

    /// Custom event name to fire after setup
    #[arg(short, long, default_value = CHANGE_DELAY_EVENT)]
    event: String,

    /// Event settings, e.g. "delay=500;status=503"
    #[arg(short, long)]
    settings: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Exit non-zero when any upload or file read failed
    #[arg(long)]
    strict: bool,

    /// Verbose diagnostics
    #[arg(short, long)]
    debug: bool,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging_config = LoggingConfig {
        debug: args.debug,
        json: args.log_json,
    };
    logging::init(&logging_config)?;

    let properties = build_properties(&args)?;
    let context = TestContext::new(args.test_run_id.clone());

    let mut event = WiremockEvent::new("wiremock", logging_config);
    event
        .before_test(&context, &properties)
        .context("wiremock setup failed")?;

    let outcome = event.custom_event(&CustomEvent::new(&args.event, args.settings.as_deref()));
    let report = match outcome {
        EventOutcome::Imported(report) => report,
        EventOutcome::Ignored => {
            println!("{YELLOW}Event '{}' ignored{RESET}", args.event);
            return Ok(());
        }
        EventOutcome::NotConfigured => anyhow::bail!("event fired before setup"),
        EventOutcome::ImportFailed(e) => return Err(e).context("import pass failed"),
    };

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report, &event.endpoints()),
    }

    if args.strict && !report.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

fn build_properties(args: &Args) -> anyhow::Result<EventProperties> {
    let mut properties = match &args.properties {
        Some(path) => EventProperties::from_file(path)?,
        None => EventProperties::new(),
    };

    if let Some(dir) = &args.files_dir {
        properties.set(WIREMOCK_FILES_DIR, dir.to_string_lossy());
    }
    if let Some(url) = &args.url {
        properties.set(WIREMOCK_URL, url.as_str());
    }
    if let Some(ms) = args.timeout_ms {
        properties.set(WIREMOCK_TIMEOUT_MS, ms.to_string());
    }
    Ok(properties)
}

fn print_report(report: &ImportReport, endpoints: &[&str]) {
    println!("{BOLD}{CYAN}WireMock Import{RESET}");
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!("{DIM}Endpoints:{RESET} {CYAN}{}{RESET}", endpoints.join(", "));
    println!();

    for upload in &report.uploads {
        let file_name = upload.file.file_name().unwrap_or_default().to_string_lossy();
        match &upload.error {
            None => println!("{GREEN}OK{RESET}   {BOLD}{file_name}{RESET} {DIM}->{RESET} {}", upload.endpoint),
            Some(e) => println!(
                "{RED}FAIL{RESET} {BOLD}{file_name}{RESET} {DIM}->{RESET} {}\n     {RED}{e}{RESET}",
                upload.endpoint
            ),
        }
    }

    for skipped in &report.skipped {
        let file_name = skipped.path.file_name().unwrap_or_default().to_string_lossy();
        match &skipped.reason {
            SkipReason::Directory => println!("{DIM}SKIP {file_name} (directory){RESET}"),
            SkipReason::Unreadable(e) => println!("{YELLOW}SKIP{RESET} {file_name} {DIM}({e}){RESET}"),
            SkipReason::ReadFailed(e) => println!("{RED}READ{RESET} {file_name} {RED}{e}{RESET}"),
        }
    }

    println!();
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!("  {DIM}Entries checked:{RESET} {BOLD}{}{RESET}", report.entries_checked);
    println!("  {DIM}Files imported:{RESET}  {BOLD}{}{RESET}", report.files_imported);
    println!("  {DIM}Uploads:{RESET}         {BOLD}{}{RESET}", report.attempted());
    if report.failed() > 0 {
        println!("  {RED}Failed:{RESET}          {BOLD}{RED}{}{RESET}", report.failed());
    } else {
        println!("  {GREEN}Failed:{RESET}          {BOLD}{GREEN}0{RESET}");
    }
    println!();

    if report.is_clean() {
        println!("{GREEN}{BOLD}All stubs uploaded{RESET}");
    } else {
        println!("{RED}{BOLD}Import finished with failures{RESET}");
    }
}
