//! Page catalog commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use rolegate_core::config::AppConfig;
use rolegate_core::result::AppResult;
use rolegate_database::CatalogStore;
use rolegate_entity::catalog::Catalog;

use crate::output::{self, OutputFormat};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog subcommand
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Mirror the configured catalog into the database
    Sync {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// List pages grouped by department
    List {
        /// Read the catalog stored in the database instead of the configuration
        #[arg(long)]
        stored: bool,
    },
}

/// Page display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PageRow {
    /// Department
    department: String,
    /// Page ID
    id: i64,
    /// Name
    name: String,
    /// Route
    route: String,
}

/// Execute catalog commands
pub async fn execute(args: &CatalogArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        CatalogCommand::Sync { force } => {
            let catalog = super::configured_catalog(config)?;
            let repos = super::repositories(config).await?;
            let stored = repos.catalog.load_catalog().await?;

            let removed: Vec<_> = stored
                .pages()
                .iter()
                .filter(|p| !catalog.contains_page(p.id))
                .collect();
            if !removed.is_empty() {
                output::print_warning(&format!(
                    "{} page(s) are no longer declared; their role permissions will be revoked:",
                    removed.len()
                ));
                for page in &removed {
                    output::print_kv(&page.id.to_string(), &page.route);
                }
                if !super::confirm("Continue?", *force)? {
                    return Ok(());
                }
            }

            let affected = repos.catalog.sync_catalog(&catalog).await?;
            if !affected.is_empty() {
                output::print_warning(&format!(
                    "{} role(s) lost grants on removed pages; their permission versions advanced.",
                    affected.len()
                ));
            }
            output::print_success(&format!(
                "Catalog synchronized: {} page(s), {} department(s).",
                catalog.pages().len(),
                catalog.departments().len()
            ));
        }
        CatalogCommand::List { stored } => {
            let catalog = if *stored {
                super::repositories(config).await?.catalog.load_catalog().await?
            } else {
                super::configured_catalog(config)?
            };
            output::print_list(&page_rows(&catalog), format);
        }
    }

    Ok(())
}

fn page_rows(catalog: &Catalog) -> Vec<PageRow> {
    catalog
        .grouped_pages()
        .into_iter()
        .flat_map(|(department_id, pages)| {
            let department = catalog
                .departments()
                .iter()
                .find(|d| d.id == department_id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "Unassigned".to_string());
            pages.into_iter().map(move |page| PageRow {
                department: department.clone(),
                id: page.id.get(),
                name: page.name,
                route: page.route,
            })
        })
        .collect()
}
