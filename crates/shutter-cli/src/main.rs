mod cmd;
mod output;
mod prompt;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, workflow::WorkflowArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shutter",
    about = "Build, validate and screenshot shuttering pages for tenant services",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: nearest directory with package.json or shutter.yaml)
    #[arg(long, global = true, env = "SHUTTER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the common content template into a new tenant folder
    Create {
        /// Tenant service name (lowercase letters, numbers, hyphens)
        #[arg(long)]
        service: String,
    },

    /// List tenants whose content template changed against a base ref
    DetectChanges {
        /// Base ref to diff against (default: git.base_branch from config)
        #[arg(long)]
        base_branch: Option<String>,
    },

    /// Run the configured asset bundler
    Bundle {
        /// Build mode; only "production" minifies
        #[arg(long, env = "NODE_ENV")]
        env: Option<String>,
    },

    /// Render the shuttering page for one tenant
    Build {
        /// Tenant service name (default: site.default_service from config)
        #[arg(long)]
        service: Option<String>,

        /// Build mode; only "production" minifies
        #[arg(long, env = "NODE_ENV")]
        env: Option<String>,
    },

    /// Lint the built page for one or more tenants
    Validate {
        /// Tenant service name (repeatable)
        #[arg(long = "service", value_name = "SERVICE")]
        services: Vec<String>,
    },

    /// Turn validation results into a pull-request comment
    Comment,

    /// Capture full-page screenshots of the built page
    Screenshot {
        /// Tenant service name (repeatable)
        #[arg(long = "service", value_name = "SERVICE")]
        services: Vec<String>,

        /// Directory for the PNG files (default: <dist>/screenshots)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run the whole pipeline locally, or as CI would
    Workflow(WorkflowArgs),

    /// Guided scaffold, build, preview and commit
    Interactive,

    /// Remove the build output directory
    Clean,

    /// Inspect the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Translate `LOG_LEVEL` into a filter directive. Numeric levels
/// (0 = error .. 5 = trace) map to names; anything else passes through.
fn log_directive(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return "info".to_string();
    };
    match value.parse::<i64>() {
        Ok(n) if n <= 0 => "error".to_string(),
        Ok(1) => "warn".to_string(),
        Ok(2 | 3) => "info".to_string(),
        Ok(4) => "debug".to_string(),
        Ok(_) => "trace".to_string(),
        Err(_) => value.to_string(),
    }
}

fn init_logging() {
    let level = std::env::var("LOG_LEVEL").ok();
    let filter = tracing_subscriber::EnvFilter::try_new(log_directive(level.as_deref()))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Create { service } => cmd::create::run(&root, &service, cli.json),
        Commands::DetectChanges { base_branch } => {
            cmd::detect::run(&root, base_branch.as_deref(), cli.json)
        }
        Commands::Bundle { env } => cmd::build::bundle(&root, env.as_deref()),
        Commands::Build { service, env } => {
            cmd::build::run(&root, service.as_deref(), env.as_deref(), cli.json)
        }
        Commands::Validate { services } => cmd::validate::run(&root, &services),
        Commands::Comment => cmd::comment::run(&root),
        Commands::Screenshot { services, output } => {
            cmd::screenshot::run(&root, &services, output.as_deref())
        }
        Commands::Workflow(args) => cmd::workflow::run(&root, args, cli.json),
        Commands::Interactive => cmd::interactive::run(&root),
        Commands::Clean => cmd::clean::run(&root),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
