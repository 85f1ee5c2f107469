use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use mitienda_probe::{execute, Cli, Reporter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let reporter = Reporter::new(cli.args.plain);

    match execute(&cli, &reporter).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("\n{} {}\n", "Error:".red().bold(), e);
            print_hint(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn print_hint(error_msg: &str) {
    if error_msg.contains("dns error") || error_msg.contains("failed to lookup") {
        eprintln!("{}", "💡 Possible causes:".yellow());
        eprintln!("   - Check that --base-url points at the right host");
        eprintln!("   - Check your network connection");
    } else if error_msg.contains("timed out") {
        eprintln!("{}", "💡 Suggestion:".yellow());
        eprintln!("   - Increase timeout with --timeout <seconds>");
        eprintln!("   - Check if the API is responsive");
    } else if error_msg.contains("onnection refused") {
        eprintln!("{}", "💡 Possible causes:".yellow());
        eprintln!("   - API server is not running");
        eprintln!("   - Wrong port in --base-url");
    } else if error_msg.contains("JWT") {
        eprintln!("{}", "💡 Usage:".yellow());
        eprintln!("   mitienda-probe decode-token \"<token>\"");
    }
}
