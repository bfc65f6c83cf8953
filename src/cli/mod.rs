//! # Command Line Interface
//!
//! One subcommand per reconciliation operation. Global flags carry the
//! Vault connection settings; each falls back to the matching `VAULT_*`
//! environment variable, then a default. The result report is printed as
//! JSON or YAML, and a failed run exits with the report's `rc`.

pub mod azure_engine;
pub mod oidc_auth;
pub mod output;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::client::{authenticated_api, VaultApi};
use crate::config::{SecretString, VaultSettings};
use crate::errors::Result;
use crate::modules;
use crate::reconcile::Report;

#[derive(Parser)]
#[command(name = "vaultsmith")]
#[command(about = "Idempotent configuration reconcilers for HashiCorp Vault")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Report whether a change would occur without applying it
    #[arg(long, global = true)]
    pub check: bool,

    /// Output format for the result report
    #[arg(long, global = true, value_enum, default_value = "json")]
    pub output: output::OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Vault connection flags, each overriding its environment variable.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Vault server address (VAULT_ADDR)
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// Vault token (VAULT_TOKEN, then ~/.vault-token)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to a PEM-encoded CA certificate file (VAULT_CACERT)
    #[arg(long, global = true)]
    pub ca_cert: Option<String>,

    /// Path to a directory of PEM-encoded CA certificates (VAULT_CAPATH)
    #[arg(long, global = true)]
    pub ca_path: Option<String>,

    /// Path to a PEM-encoded client certificate (VAULT_CLIENT_CERT)
    #[arg(long, global = true)]
    pub client_cert: Option<String>,

    /// Path to the client certificate's private key (VAULT_CLIENT_KEY)
    #[arg(long, global = true)]
    pub client_key: Option<String>,

    /// Skip TLS certificate verification (VAULT_SKIP_VERIFY); not
    /// recommended outside testing
    #[arg(long, global = true)]
    pub skip_verify: bool,

    /// Authentication method: token, userpass, ldap or approle (VAULT_AUTHTYPE)
    #[arg(long, global = true)]
    pub auth_method: Option<String>,

    /// Username for userpass/ldap login (VAULT_USER)
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for userpass/ldap login (VAULT_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Role id for approle login (VAULT_ROLE_ID)
    #[arg(long, global = true)]
    pub role_id: Option<String>,

    /// Secret id for approle login (VAULT_SECRET_ID)
    #[arg(long, global = true)]
    pub secret_id: Option<String>,

    /// Vault Enterprise namespace (VAULT_NAMESPACE)
    #[arg(long, global = true)]
    pub namespace: Option<String>,
}

impl ConnectionArgs {
    /// Resolve settings: environment first, then flag overrides.
    pub fn resolve(&self) -> Result<VaultSettings> {
        let mut settings = VaultSettings::from_env()?;

        if let Some(address) = &self.address {
            settings.address = address.clone();
        }
        if let Some(token) = &self.token {
            settings.token = SecretString::new(token.clone());
        }
        if let Some(ca_cert) = &self.ca_cert {
            settings.ca_cert = Some(ca_cert.clone());
        }
        if let Some(ca_path) = &self.ca_path {
            settings.ca_path = Some(ca_path.clone());
        }
        if let Some(client_cert) = &self.client_cert {
            settings.client_cert = Some(client_cert.clone());
        }
        if let Some(client_key) = &self.client_key {
            settings.client_key = Some(client_key.clone());
        }
        if self.skip_verify {
            settings.verify = false;
        }
        if let Some(method) = &self.auth_method {
            settings.auth_method = method.parse()?;
        }
        if let Some(username) = &self.username {
            settings.username = username.clone();
        }
        if let Some(password) = &self.password {
            settings.password = SecretString::new(password.clone());
        }
        if let Some(role_id) = &self.role_id {
            settings.role_id = role_id.clone();
        }
        if let Some(secret_id) = &self.secret_id {
            settings.secret_id = SecretString::new(secret_id.clone());
        }
        if let Some(namespace) = &self.namespace {
            settings.namespace = Some(namespace.clone());
        }

        Ok(settings)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile the Azure secret engine configuration
    AzureEngine(azure_engine::AzureEngineArgs),

    /// Reconcile an OIDC auth method configuration
    OidcAuth(oidc_auth::OidcAuthArgs),

    /// Submit an unseal key shard
    Unseal {
        /// Unseal key shard
        #[arg(long)]
        key: String,
    },

    /// AppRole management commands
    Approle {
        #[command(subcommand)]
        command: ApproleCommands,
    },
}

#[derive(Subcommand)]
pub enum ApproleCommands {
    /// List secret-id accessors for a role
    SecretIds {
        /// Role name
        #[arg(long)]
        name: String,

        /// Auth method mount point
        #[arg(long, default_value = "approle")]
        mount_point: String,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    initialise_logging(cli.verbose);

    let settings = cli.connection.resolve()?;
    let report = Report::from_run(run_command(cli.command, &settings, cli.check).await);

    output::print_output(&report, cli.output)?;

    if report.failed {
        std::process::exit(report.rc.unwrap_or(1));
    }
    Ok(())
}

async fn run_command(command: Commands, settings: &VaultSettings, check: bool) -> Result<Report> {
    match command {
        Commands::AzureEngine(args) => {
            let config = args.into_config()?;
            let api = authenticated_api(settings).await?;
            modules::azure_engine::run(&api, &config, check).await
        }
        Commands::OidcAuth(args) => {
            let config = args.into_config();
            let api = authenticated_api(settings).await?;
            modules::oidc_auth::run(&api, &config, check).await
        }
        Commands::Unseal { key } => {
            // Unseal needs no token; skip the login round-trip.
            let api = VaultApi::new(settings, SecretString::default())?;
            modules::unseal::run(&api, &SecretString::new(key)).await
        }
        Commands::Approle { command } => match command {
            ApproleCommands::SecretIds { name, mount_point } => {
                let api = authenticated_api(settings).await?;
                modules::approle::list_secret_ids(&api, &mount_point, &name).await
            }
        },
    }
}

fn initialise_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
}
