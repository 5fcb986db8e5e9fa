//! lambda: run a short-lived workload on the orchestrator and stream its output.
//!
//! ```text
//! lambda --pod p1 --image img --env FOO=bar --timeout 120 -- echo hi
//! ```
//!
//! Exits with the workload's exit code. Client-side failures print to stderr and exit
//! with [`FAILURE_STATUS`].

use std::{io::Write, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use lambda_core::{RunConfig, run_and_wait};
use lambda_model::{RunParams, build};
use lambda_observe::{LoggerConfig, LoggerFormat, logger_init};
use lambda_rpc::GrpcOrchestrator;

/// Reserved status for failures of the client itself (not the workload).
const FAILURE_STATUS: u8 = 125;

#[derive(Parser, Debug)]
#[command(name = "lambda")]
#[command(about = "Run a short-lived workload on the orchestrator and stream its output")]
#[command(version)]
struct Cli {
    /// Orchestrator gRPC endpoint
    #[arg(long, default_value = "http://127.0.0.1:5001")]
    server: String,

    /// Target pool
    #[arg(long)]
    pod: String,

    /// Image to run
    #[arg(long)]
    image: String,

    /// Entrypoint name
    #[arg(long, default_value = "run")]
    name: String,

    /// Network to join
    #[arg(long, default_value = "bridge")]
    network: String,

    /// Working directory inside the unit
    #[arg(long, default_value = "/")]
    working_dir: String,

    /// Environment entry, repeatable (sent as LAMBDA_KEY=VALUE)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    envs: Vec<String>,

    /// Volume mount spec, repeatable
    #[arg(long = "volume", value_name = "SPEC")]
    volumes: Vec<String>,

    /// CPU quota in cores
    #[arg(long, default_value_t = 1.0)]
    cpu: f64,

    /// Memory limit in bytes
    #[arg(long, default_value_t = 512 * 1024 * 1024)]
    mem: i64,

    /// Number of replicas
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..))]
    count: i32,

    /// Seconds before still-running units are removed
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Remove units at the deadline even after a clean finish; waits for the deadline
    #[arg(long)]
    no_cancel_on_completion: bool,

    /// Log filter directive
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: LoggerFormat,

    /// Command to run
    #[arg(required = true, trailing_var_arg = true, num_args = 1..)]
    command: Vec<String>,
}

impl Cli {
    fn params(&self) -> RunParams {
        RunParams {
            pool: self.pod.clone(),
            image: self.image.clone(),
            name: self.name.clone(),
            command: self.command.join(" "),
            network: self.network.clone(),
            working_dir: self.working_dir.clone(),
            env: self.envs.clone(),
            volumes: self.volumes.clone(),
            cpu: self.cpu,
            memory: self.mem,
            count: self.count,
        }
    }

    fn run_config(&self) -> RunConfig {
        RunConfig {
            endpoint: self.server.clone(),
            timeout: Duration::from_secs(self.timeout),
            cancel_on_completion: !self.no_cancel_on_completion,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_cfg = LoggerConfig {
        format: cli.log_format,
        level: cli.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = logger_init(&log_cfg) {
        eprintln!("lambda: {}", e);
        return ExitCode::from(FAILURE_STATUS);
    }

    let result = run(&cli).await;
    ExitCode::from(report(result, &mut std::io::stderr()))
}

/// Map the run result to a process status, writing client failures to `err`.
fn report(result: anyhow::Result<Option<i32>>, err: &mut impl Write) -> u8 {
    let failure = match result {
        Ok(Some(code)) => return exit_status(code),
        Ok(None) => "stream ended without an exit code".to_string(),
        Err(e) => format!("{:#}", e),
    };
    let _ = writeln!(err, "lambda: {}", failure);
    FAILURE_STATUS
}

async fn run(cli: &Cli) -> anyhow::Result<Option<i32>> {
    let config = cli.run_config();
    config.validate()?;

    let request = build(&cli.params()).context("building run request")?;
    debug!(manifest = %request.manifest, "request built");

    let orchestrator = Arc::new(GrpcOrchestrator::connect(config.endpoint.clone()).await?);
    info!(endpoint = orchestrator.endpoint(), "connected");

    let outcome = run_and_wait(orchestrator, &request, &config, std::io::stdout()).await?;
    if !config.cancel_on_completion {
        debug!("waiting for the reclaimer deadline");
    }
    Ok(outcome.finish().await)
}

/// Workload exit code as a process status, truncated to 8 bits like `exit(3)`.
fn exit_status(code: i32) -> u8 {
    (code & 0xff) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_a_full_invocation() {
        let cli = Cli::try_parse_from([
            "lambda", "--pod", "p1", "--image", "img", "--env", "FOO=1", "--env", "BAR=2",
            "--volume", "/a:/a", "--count", "3", "--timeout", "10", "--", "echo", "hi",
        ])
        .unwrap();

        let params = cli.params();
        assert_eq!(params.pool, "p1");
        assert_eq!(params.image, "img");
        assert_eq!(params.command, "echo hi");
        assert_eq!(params.env, vec!["FOO=1", "BAR=2"]);
        assert_eq!(params.volumes, vec!["/a:/a"]);
        assert_eq!(params.count, 3);

        let cfg = cli.run_config();
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert!(cfg.cancel_on_completion);
    }

    #[test]
    fn command_flags_after_separator_are_not_parsed() {
        let cli = Cli::try_parse_from([
            "lambda", "--pod", "p", "--image", "i", "--", "ls", "--count", "-la",
        ])
        .unwrap();
        assert_eq!(cli.params().command, "ls --count -la");
        assert_eq!(cli.count, 1);
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["lambda", "--pod", "p", "--image", "i"]).is_err());
    }

    #[test]
    fn zero_replicas_rejected() {
        assert!(
            Cli::try_parse_from(["lambda", "--pod", "p", "--image", "i", "--count", "0", "true"])
                .is_err()
        );
    }

    #[test]
    fn no_cancel_flag_keeps_reclaimer_armed() {
        let cli = Cli::try_parse_from([
            "lambda", "--pod", "p", "--image", "i", "--no-cancel-on-completion", "true",
        ])
        .unwrap();
        assert!(!cli.run_config().cancel_on_completion);
    }

    #[test]
    fn workload_code_is_reported_silently() {
        let mut err = Vec::new();
        assert_eq!(report(Ok(Some(3)), &mut err), 3);
        assert!(err.is_empty());
    }

    #[test]
    fn missing_exit_code_is_a_client_failure() {
        let mut err = Vec::new();
        assert_eq!(report(Ok(None), &mut err), FAILURE_STATUS);
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "lambda: stream ended without an exit code\n"
        );
    }

    #[test]
    fn run_error_is_a_client_failure() {
        let mut err = Vec::new();
        let result = Err(anyhow::anyhow!("connection refused").context("connecting"));
        assert_eq!(report(result, &mut err), FAILURE_STATUS);
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "lambda: connecting: connection refused\n"
        );
    }

    #[test]
    fn exit_status_truncates_like_exit() {
        assert_eq!(exit_status(0), 0);
        assert_eq!(exit_status(42), 42);
        assert_eq!(exit_status(256), 0);
        assert_eq!(exit_status(-1), 255);
    }
}
