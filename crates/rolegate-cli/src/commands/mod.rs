//! CLI command definitions and dispatch.

pub mod catalog;
pub mod check;
pub mod migrate;
pub mod permission;
pub mod role;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use rolegate_core::config::AppConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::{
    CatalogRepository, DatabasePool, RolePermissionRepository, RoleRepository,
};
use rolegate_entity::catalog::Catalog;

use crate::output::{self, OutputFormat};

/// Rolegate operator CLI for the role and page permission engine
#[derive(Debug, Parser)]
#[command(name = "rolegate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Page catalog management
    Catalog(catalog::CatalogArgs),
    /// Role management
    Role(role::RoleArgs),
    /// Role permission-set management
    Permission(permission::PermissionArgs),
    /// Resolve a user's effective access to a page
    Check(check::CheckArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::Catalog(args) => catalog::execute(args, config, self.format).await,
            Commands::Role(args) => role::execute(args, config, self.format).await,
            Commands::Permission(args) => permission::execute(args, config, self.format).await,
            Commands::Check(args) => check::execute(args, config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> AppResult<AppConfig> {
    AppConfig::load(config_path)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> AppResult<DatabasePool> {
    DatabasePool::connect(&config.database).await
}

/// Helper: validate the configured catalog
pub fn configured_catalog(config: &AppConfig) -> AppResult<Catalog> {
    Catalog::from_config(&config.catalog)
}

/// PostgreSQL repositories sharing one pool.
pub struct Repositories {
    /// Role rows.
    pub roles: Arc<RoleRepository>,
    /// Permission sets.
    pub permissions: Arc<RolePermissionRepository>,
    /// Catalog mirror.
    pub catalog: Arc<CatalogRepository>,
}

/// Helper: connect and build every repository
pub async fn repositories(config: &AppConfig) -> AppResult<Repositories> {
    let pool = create_db_pool(config).await?.into_pool();
    Ok(Repositories {
        roles: Arc::new(RoleRepository::new(pool.clone())),
        permissions: Arc::new(RolePermissionRepository::new(pool.clone())),
        catalog: Arc::new(CatalogRepository::new(pool)),
    })
}

/// Helper: ask before a destructive action unless `force` is set
pub fn confirm(prompt: &str, force: bool) -> AppResult<bool> {
    if force {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
    if !confirmed {
        output::print_warning("Cancelled.");
    }
    Ok(confirmed)
}
