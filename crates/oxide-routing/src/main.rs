//! oxide-route CLI
//!
//! Command-line tool for inspecting and testing route tables.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use oxide_routing::{Method, PathParams, Request, RouteMatch, Router, RouterConfig};

/// Route table inspection and matching.
#[derive(Parser)]
#[command(name = "oxide-route")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route table file (JSON).
    #[arg(short, long, env = "OXIDE_ROUTES", default_value = "routes.json")]
    routes: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every route and report errors.
    Check,

    /// List collections and routes with their compiled patterns.
    List,

    /// Match a request against the route table.
    Match {
        /// Request path, optionally with a query string.
        path: String,

        /// Request method.
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request scheme.
        #[arg(short, long, default_value = "http")]
        scheme: String,

        /// Request host name.
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Match the path only, ignoring method, scheme and host.
        #[arg(long)]
        basic: bool,
    },
}

/// JSON report of a successful match.
#[derive(Serialize)]
struct MatchReport<'a> {
    route: &'a str,
    path: &'a str,
    controller: &'a str,
    action: &'a str,
    params: &'a PathParams,
}

impl<'a> From<&'a RouteMatch<'a>> for MatchReport<'a> {
    fn from(matched: &'a RouteMatch<'a>) -> Self {
        Self {
            route: matched.route.name(),
            path: matched.route.path(),
            controller: matched.route.controller(),
            action: matched.route.action(),
            params: &matched.params,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let router = RouterConfig::from_path(&cli.routes)?.build()?;

    match cli.command {
        Commands::Check => {
            let compiled = router.validate()?;
            info!("{compiled} routes compiled successfully.");
        }

        Commands::List => list(&router)?,

        Commands::Match {
            path,
            method,
            scheme,
            host,
            basic,
        } => {
            let method = Method::parse(&method)
                .ok_or_else(|| anyhow::anyhow!("unknown method: {method}"))?;
            let request = Request::new(method, path)
                .with_scheme(scheme)
                .with_hostname(host);

            let matched = if basic {
                router.match_path(&request.path)?
            } else {
                router.match_request(&request)?
            };

            let Some(matched) = matched else {
                warn!("No route matched {} {}", request.method, request.path);
                return Ok(ExitCode::FAILURE);
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&MatchReport::from(&matched))?
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn list(router: &Router) -> anyhow::Result<()> {
    for (index, collection) in router.collections().iter().enumerate() {
        println!(
            "collection #{index} (prefix: {})",
            collection.prefix().unwrap_or("none")
        );
        for route in collection {
            println!(
                "  {:<24} {:<8} {:<8} {:<16} {}",
                route.name(),
                route.method(),
                route.scheme(),
                route.hostname(),
                router.generator().compile(route)?.as_str()
            );
        }
    }
    Ok(())
}
