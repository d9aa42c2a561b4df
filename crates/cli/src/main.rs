//! size-report CLI - size-limit comparison for pull requests

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

mod error;
mod git;
mod github;
mod package_manager;
mod runner;

use error::Error;
use github::{publish_report, GitHubActionsEnv, GitHubClient, Published, PullRequestInfo};
use package_manager::PackageManager;
use runner::Runner;
use size_report_core::{
    format_results, parse_from_file, parse_from_string, render_report, render_table, summarize,
    NormalizedReport,
};

/// size-report: compare size-limit results of a pull request with its base branch
#[derive(Parser, Debug)]
#[command(name = "size-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Measure both branches and comment the comparison on the pull request
    Run(RunArgs),
    /// Compare two saved `size-limit --json` outputs
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[arg(long, env = "INPUT_GITHUB_TOKEN")]
    github_token: Option<String>,

    /// Package script that builds the project
    #[arg(long, env = "INPUT_BUILD_SCRIPT")]
    build_script: Option<String>,

    /// Package script run after measuring
    #[arg(long, env = "INPUT_CLEAN_SCRIPT")]
    clean_script: Option<String>,

    /// yarn, pnpm, bun or npm; detected from lockfiles when omitted
    #[arg(long, env = "INPUT_PACKAGE_MANAGER")]
    package_manager: Option<String>,

    /// Project directory, defaults to the current directory
    #[arg(long, env = "INPUT_DIRECTORY")]
    directory: Option<PathBuf>,

    /// Base branch to compare against instead of the pull request base
    #[arg(long)]
    base_branch: Option<String>,

    /// Pull request number instead of the one in the event payload
    #[arg(long)]
    pr_number: Option<u64>,

    /// Print the report instead of commenting on the pull request
    #[arg(long, default_value = "false")]
    skip_comment: bool,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// size-limit output of the base branch
    #[arg(long, value_name = "FILE")]
    base: PathBuf,

    /// size-limit output of the current branch
    #[arg(long, value_name = "FILE")]
    current: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full comment body with heading
    Markdown,
    /// Rows and summary as JSON
    Json,
    /// Markdown table only
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Run(args) => run_command(args),
        Commands::Compare(args) => compare_command(args),
    }
}

/// Treat empty strings from unset action inputs as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn resolve_pull_request(args: &RunArgs, gh_env: &GitHubActionsEnv) -> Result<PullRequestInfo> {
    let from_event = gh_env
        .pull_request()
        .with_context(|| "Failed to read the workflow event")?;

    let number = args.pr_number.or(from_event.as_ref().map(|pr| pr.number));
    let base_ref = non_empty(args.base_branch.clone()).or(from_event.map(|pr| pr.base_ref));

    match (number, base_ref) {
        (Some(number), Some(base_ref)) => Ok(PullRequestInfo { number, base_ref }),
        (None, Some(base_ref)) if args.skip_comment => Ok(PullRequestInfo {
            number: 0,
            base_ref,
        }),
        _ => anyhow::bail!("No PR found. Only pull_request workflows are supported."),
    }
}

fn parse_reports(base_output: &str, current_output: &str) -> Result<(NormalizedReport, NormalizedReport)> {
    let parsed = parse_from_string(base_output).and_then(|base| {
        let current = parse_from_string(current_output)?;
        Ok((base, current))
    });

    parsed.map_err(|e| {
        error!("Error parsing size-limit output. The output should be a json.");
        anyhow::Error::new(e)
    })
}

fn run_command(args: RunArgs) -> Result<()> {
    info!("Running size-limit comparison");

    let gh_env = GitHubActionsEnv::from_env();
    if GitHubActionsEnv::is_github_actions() {
        debug!("Running in GitHub Actions environment");
    }

    let pr = resolve_pull_request(&args, &gh_env)?;

    let directory = match args.directory.clone().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let manager = match non_empty(args.package_manager.clone()) {
        Some(name) => name.parse::<PackageManager>()?,
        None => PackageManager::detect(&directory),
    };
    let runner = Runner::new(&directory, manager)
        .with_build_script(non_empty(args.build_script.clone()).unwrap_or_else(|| "build".to_string()))
        .with_clean_script(non_empty(args.clean_script.clone()));

    info!("Using {} in {:?}", runner.manager(), runner.directory());
    if let Ok(Some(branch)) = git::current_branch(runner.directory()) {
        debug!("Current branch: {}", branch);
    }

    let current = runner
        .measure(None)
        .with_context(|| "Failed to measure the current branch")?;
    let base = runner
        .measure(Some(&pr.base_ref))
        .with_context(|| format!("Failed to measure base branch '{}'", pr.base_ref))?;

    let (base_report, current_report) = parse_reports(&base.output, &current.output)?;

    let summary = summarize(&base_report, &current_report);
    info!(
        "Compared against {}: {} ({} added, {} removed, {} changed)",
        pr.base_ref,
        summary.short_summary(current_report.len()),
        summary.added.len(),
        summary.removed.len(),
        summary.changed.len()
    );

    let body = render_report(&base_report, &current_report);

    if args.skip_comment {
        println!("{}", body);
    } else {
        publish(&args, &gh_env, pr.number, &body)?;
    }

    if current.limit_exceeded() {
        error!("Size limit has been exceeded.");
        std::process::exit(1);
    }

    Ok(())
}

fn publish(args: &RunArgs, gh_env: &GitHubActionsEnv, pr_number: u64, body: &str) -> Result<()> {
    let token = non_empty(args.github_token.clone()).or_else(|| gh_env.token.clone());
    let (owner, repo) = gh_env
        .get_owner_repo()
        .ok_or_else(|| anyhow::anyhow!("GITHUB_REPOSITORY is not set or invalid"))?;

    let mut client = GitHubClient::new(token)?;
    if let Some(api_url) = gh_env.api_url.as_deref() {
        client = client.with_api_base(api_url);
    }

    report_published(publish_report(&client, &owner, &repo, pr_number, body))
}

/// Log the publish outcome; only a failed comment write is tolerated
fn report_published(outcome: std::result::Result<Published, Error>) -> Result<()> {
    match outcome {
        Ok(Published::Created(url)) => info!("Created comment: {}", url),
        Ok(Published::Updated(url)) => info!("Updated comment: {}", url),
        Err(Error::CommentWrite(e)) => warn!(
            "Error publishing comment. This can happen for PRs originating from a fork without write permissions: {}",
            e
        ),
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to list pull request comments")),
    }

    Ok(())
}

fn compare_command(args: CompareArgs) -> Result<()> {
    let base = parse_from_file(&args.base)
        .with_context(|| format!("Failed to parse base report: {:?}", args.base))?;
    let current = parse_from_file(&args.current)
        .with_context(|| format!("Failed to parse current report: {:?}", args.current))?;

    match args.format {
        OutputFormat::Markdown => println!("{}", render_report(&base, &current)),
        OutputFormat::Table => println!("{}", render_table(&format_results(&base, &current))),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "rows": format_results(&base, &current),
                "summary": summarize(&base, &current),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Run(args) => args,
            other => panic!("expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("build".to_string())), Some("build".to_string()));
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_resolve_pull_request_from_flags() {
        let args = run_args(&[
            "size-report",
            "run",
            "--base-branch",
            "main",
            "--pr-number",
            "12",
        ]);

        let pr = resolve_pull_request(&args, &GitHubActionsEnv::default()).unwrap();
        assert_eq!(pr.number, 12);
        assert_eq!(pr.base_ref, "main");
    }

    #[test]
    fn test_resolve_pull_request_missing() {
        let args = run_args(&["size-report", "run", "--base-branch", "main"]);
        assert!(resolve_pull_request(&args, &GitHubActionsEnv::default()).is_err());

        let args = run_args(&["size-report", "run", "--base-branch", "main", "--skip-comment"]);
        let pr = resolve_pull_request(&args, &GitHubActionsEnv::default()).unwrap();
        assert_eq!(pr.base_ref, "main");
    }

    #[test]
    fn test_parse_reports_rejects_non_json() {
        assert!(parse_reports("[]", "Error: no config").is_err());

        let (base, current) =
            parse_reports(r#"[{"name":"a","size":1}]"#, r#"[{"name":"a","size":2}]"#).unwrap();
        assert_eq!(base.len(), 1);
        assert_eq!(current.get("a").unwrap().size, 2.0);
    }

    #[test]
    fn test_report_published_tolerates_only_write_failures() {
        assert!(report_published(Ok(Published::Created("url".to_string()))).is_ok());

        let write = Error::CommentWrite(Box::new(Error::GitHub("403".to_string())));
        assert!(report_published(Err(write)).is_ok());

        let list = Error::GitHub("Failed to list comments: 500".to_string());
        assert!(report_published(Err(list)).is_err());
    }

    #[test]
    fn test_compare_args() {
        let cli = Cli::try_parse_from([
            "size-report",
            "compare",
            "--base",
            "base.json",
            "--current",
            "current.json",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.base, PathBuf::from("base.json"));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("expected compare command, got {:?}", other),
        }
    }
}
