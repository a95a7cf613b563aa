//! OSB Bridge command-line shell
//!
//! Thin wrapper that loads configuration, installs logging and runs one
//! catalog or lifecycle operation. Core logic lives in the library crates.

mod dry_run;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dry_run::DryRunReifier;
use osb_controller::{BrokerController, LifecycleController};
use osb_core::{
    resource_name, AppConfig, Binding, BindingRequest, ResourceKind, Service,
    ServiceInstanceRequest,
};
use osb_registry::{BlobClient, CatalogResolver, HttpRegistry, ServiceRegistry, StaticRegistry};
use osb_storage::{BindingStorage, BindingStore, MemoryWatcher};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "osb-bridge", version, about = "Service broker bridge tools")]
struct Cli {
    /// Configuration file (defaults to the XDG config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read services from a JSON file instead of the registry API
    #[arg(long, global = true, value_name = "SERVICES_JSON")]
    local: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the catalog and print it as JSON
    Catalog,
    /// Resolve the chart locators of one plan
    Types {
        /// Service ID
        #[arg(long)]
        service: String,
        /// Plan ID
        #[arg(long)]
        plan: String,
    },
    /// Fetch the schema published next to a `gs://` artifact
    Schema {
        /// Artifact locator
        locator: String,
    },
    /// Print the cluster resource name for a broker ID
    Name {
        /// Broker instance or binding ID
        id: String,
        /// `instance` or `binding`
        #[arg(long, default_value = "instance")]
        kind: String,
    },
    /// Stage a plan's chart and report what would be provisioned
    Provision {
        /// Broker instance ID
        instance_id: String,
        /// Service ID
        #[arg(long)]
        service: String,
        /// Plan ID
        #[arg(long)]
        plan: String,
    },
    /// Bind against an instance and print the binding record that would be stored
    Bind {
        /// Broker instance ID
        instance_id: String,
        /// Broker binding ID
        binding_id: String,
        /// Service ID
        #[arg(long)]
        service: String,
        /// Plan ID
        #[arg(long)]
        plan: String,
    },
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,osb=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load().context("loading config")?,
    };
    config.with_env().context("applying environment overrides")
}

fn load_services(path: &Path) -> Result<Vec<Service>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading services from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing services from {}", path.display()))
}

/// Registry backing the command: a local services file or the HTTP API.
fn registry(local: Option<&Path>, config: &AppConfig) -> Result<Arc<dyn ServiceRegistry>> {
    match local {
        Some(path) => {
            let services = load_services(path)?;
            info!(path = %path.display(), services = services.len(), "using local registry");
            Ok(Arc::new(StaticRegistry::new(services)))
        }
        None => {
            info!(registry = %config.registry.base_url(), "using registry API");
            Ok(Arc::new(HttpRegistry::new(&config.registry)?))
        }
    }
}

fn resolver(local: Option<&Path>, config: &AppConfig) -> Result<CatalogResolver> {
    let blobs = BlobClient::new(&config.blob)?;
    Ok(CatalogResolver::new(registry(local, config)?, blobs))
}

fn dry_run_controller(
    local: Option<&Path>,
    config: &AppConfig,
) -> Result<(LifecycleController, Arc<DryRunReifier>)> {
    let reifier = Arc::new(DryRunReifier::default());
    let controller =
        LifecycleController::from_config(config, registry(local, config)?, reifier.clone())?;
    Ok((controller, reifier))
}

async fn run(cli: Cli) -> Result<()> {
    let settings = || load_config(cli.config.as_deref());
    let local = cli.local.as_deref();

    match cli.command {
        Command::Name { id, kind } => {
            let kind: ResourceKind = kind.parse()?;
            println!("{}", resource_name(&id, kind));
        }
        Command::Catalog => {
            let catalog = resolver(local, &settings()?)?.catalog().await?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Command::Types { service, plan } => {
            let types = resolver(local, &settings()?)?
                .plan_types(&service, &plan)
                .await?;
            println!("{}", serde_json::to_string_pretty(&types)?);
        }
        Command::Schema { locator } => {
            let schema = BlobClient::new(&settings()?.blob)?
                .fetch_schema(&locator)
                .await?;
            println!("{}", schema.inputs);
        }
        Command::Provision {
            instance_id,
            service,
            plan,
        } => {
            let (controller, reifier) = dry_run_controller(local, &settings()?)?;
            let request = ServiceInstanceRequest {
                service_id: service,
                plan_id: plan,
                ..ServiceInstanceRequest::default()
            };

            controller
                .create_service_instance(&instance_id, &request)
                .await?;
            println!("{}", serde_json::to_string_pretty(&reifier.actions())?);
        }
        Command::Bind {
            instance_id,
            binding_id,
            service,
            plan,
        } => {
            let config = settings()?;
            let namespace = config.storage.namespace()?;
            let (controller, reifier) = dry_run_controller(local, &config)?;
            let request = BindingRequest {
                service_id: service,
                plan_id: plan,
                ..BindingRequest::default()
            };
            controller.bind(&instance_id, &binding_id, &request).await?;

            // Records live only for this run; the output shows what would be stored.
            let store = BindingStore::new(Arc::new(MemoryWatcher::new()), namespace);
            let mut binding = Binding::new(
                resource_name(&binding_id, ResourceKind::ServiceBinding),
                resource_name(&instance_id, ResourceKind::ServiceInstance),
            );
            binding.spec.osb_guid = binding_id;
            store.create(binding).await?;
            let bindings = store.list().await?;

            let output = json!({
                "actions": reifier.actions(),
                "bindings": bindings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse()).await
}
