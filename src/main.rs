use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use storefront_e2e::scenarios::data::DEFAULT_NEGATIVE_LOGINS;
use storefront_e2e::scenarios::flows::LOGIN_USERS;
use storefront_e2e::scenarios::{self, load_negative_logins, ScenarioKind, ScenarioReport};
use storefront_e2e::utils::{init_tracing, ArtifactRecorder};
use storefront_e2e::{ChromeDriver, Session, SuiteConfig};
use tracing::{error, info, warn};

/// Page-object end-to-end checks for the Swag Labs storefront
#[derive(Parser, Debug)]
#[command(name = "storefront-e2e")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON suite configuration
    #[arg(long, global = true, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,

    /// Storefront base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Directory for screenshots and reports
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Buy five items, check every checkout page, then reset and log out
    Checkout {
        /// Two items through the reusable flows instead
        #[arg(long)]
        express: bool,
    },

    /// Log in and land on the catalog
    Login {
        /// User to log in as; repeat for several. Defaults to every accepted user
        #[arg(long = "user")]
        users: Vec<String>,
    },

    /// Rejected logins read from a CSV file
    Negative {
        #[arg(long, default_value = DEFAULT_NEGATIVE_LOGINS)]
        data: PathBuf,
    },

    /// Checkout form validation
    RequiredInfo,

    /// Every scenario above
    All {
        #[arg(long, default_value = DEFAULT_NEGATIVE_LOGINS)]
        data: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let kinds = plan(&cli.command)?;
    let recorder = ArtifactRecorder::new(config.artifacts.clone())?;

    info!("Running {} scenario(s) against {}", kinds.len(), config.session.base_url);
    let mut reports = Vec::with_capacity(kinds.len());
    for kind in &kinds {
        reports.push(run_isolated(kind, &config, &recorder).await?);
    }

    if config.artifacts.write_reports {
        let path = recorder.write_summary(&reports).await?;
        info!("Summary written to {}", path.display());
    }
    Ok(summarize(&reports))
}

fn load_config(cli: &Cli) -> anyhow::Result<SuiteConfig> {
    let config = match &cli.config {
        Some(path) => SuiteConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SuiteConfig::default(),
    };
    let mut config = config.apply_env()?;

    if let Some(base_url) = &cli.base_url {
        config.session.base_url = base_url.clone();
    }
    if cli.headed {
        config.browser.headless = false;
    }
    if let Some(dir) = &cli.artifacts {
        config.artifacts.dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn plan(command: &Command) -> anyhow::Result<Vec<ScenarioKind>> {
    let login_users = |users: &[String]| -> Vec<ScenarioKind> {
        if users.is_empty() {
            LOGIN_USERS
                .iter()
                .map(|user| ScenarioKind::LoginAs(user.to_string()))
                .collect()
        } else {
            users.iter().cloned().map(ScenarioKind::LoginAs).collect()
        }
    };
    let negatives = |data: &PathBuf| -> anyhow::Result<Vec<ScenarioKind>> {
        let cases = load_negative_logins(data)?;
        Ok(cases.into_iter().map(ScenarioKind::NegativeLogin).collect())
    };

    let kinds = match command {
        Command::Checkout { express: false } => vec![ScenarioKind::FullCheckout],
        Command::Checkout { express: true } => vec![ScenarioKind::ExpressCheckout],
        Command::Login { users } => login_users(users),
        Command::Negative { data } => negatives(data)?,
        Command::RequiredInfo => vec![ScenarioKind::CheckoutRequiresInfo],
        Command::All { data } => {
            let mut kinds = login_users(&[]);
            kinds.extend(negatives(data)?);
            kinds.push(ScenarioKind::CheckoutRequiresInfo);
            kinds.push(ScenarioKind::ExpressCheckout);
            kinds.push(ScenarioKind::FullCheckout);
            kinds
        }
    };
    Ok(kinds)
}

/// Each scenario gets a browser of its own.
async fn run_isolated(
    kind: &ScenarioKind,
    config: &SuiteConfig,
    recorder: &ArtifactRecorder,
) -> anyhow::Result<ScenarioReport> {
    let driver = ChromeDriver::launch(&config.browser, &config.session)
        .with_context(|| format!("launching browser for {}", kind.name()))?;
    let session = Session::new(Arc::new(driver), config.session.clone())?;

    let report = scenarios::run(kind, &session, recorder).await;
    if let Err(e) = session.close().await {
        warn!("Closing browser for {} failed: {}", kind.name(), e);
    }
    Ok(report)
}

fn summarize(reports: &[ScenarioReport]) -> ExitCode {
    let failed: Vec<&ScenarioReport> = reports.iter().filter(|r| !r.passed()).collect();
    for report in reports {
        let status = if report.passed() { "PASS" } else { "FAIL" };
        println!("{} {}", status, report.name);
    }
    println!("{} passed, {} failed", reports.len() - failed.len(), failed.len());

    if failed.is_empty() {
        ExitCode::SUCCESS
    } else {
        for report in failed {
            error!(
                "{} failed: {}",
                report.name,
                report.error.as_deref().unwrap_or("unknown error")
            );
        }
        ExitCode::FAILURE
    }
}
