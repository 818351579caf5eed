//! Role permission-set CLI commands.

use std::str::FromStr;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use rolegate_core::config::AppConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::{PageId, RoleId};
use rolegate_database::PermissionStore;
use rolegate_entity::catalog::Catalog;
use rolegate_entity::permission::{DataScope, PagePermission, PermissionSet};

use crate::output::{self, OutputFormat};

/// Arguments for permission commands
#[derive(Debug, Args)]
pub struct PermissionArgs {
    /// Permission subcommand
    #[command(subcommand)]
    pub command: PermissionCommand,
}

/// Permission subcommands
#[derive(Debug, Subcommand)]
pub enum PermissionCommand {
    /// Show a role's permission set and version
    Show {
        /// Role ID
        role: RoleId,
    },
    /// Replace a role's full permission set
    ///
    /// Each grant is `PAGE=FLAGS@SCOPE`, where PAGE is a page id or route,
    /// FLAGS is a comma list of view, edit, assign, and SCOPE is self,
    /// subordinates or all. Pages not listed are revoked.
    Set {
        /// Role ID
        role: RoleId,
        /// Grants, e.g. `/creators=view,edit@subordinates`
        #[arg(short, long = "grant")]
        grants: Vec<GrantArg>,
        /// Fail if the set changed since this version was read
        #[arg(long)]
        expected_version: Option<i64>,
        /// Skip confirmation prompt when revoking every page
        #[arg(long)]
        force: bool,
    },
    /// Grant every capability with `all` scope on every catalog page
    GrantAll {
        /// Role ID
        role: RoleId,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Page reference accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef {
    /// Numeric page id.
    Id(PageId),
    /// Page route, starting with `/`.
    Route(String),
}

impl PageRef {
    fn resolve(&self, catalog: &Catalog) -> AppResult<PageId> {
        match self {
            Self::Id(id) => catalog.require_page(*id).map(|p| p.id),
            Self::Route(route) => catalog.require_route(route).map(|p| p.id),
        }
    }
}

/// One `PAGE=FLAGS@SCOPE` grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantArg {
    page: PageRef,
    can_view: bool,
    can_edit: bool,
    can_assign: bool,
    data_scope: DataScope,
}

impl GrantArg {
    fn to_entry(&self, catalog: &Catalog) -> AppResult<PagePermission> {
        Ok(PagePermission {
            page_id: self.page.resolve(catalog)?,
            can_view: self.can_view,
            can_edit: self.can_edit,
            can_assign: self.can_assign,
            data_scope: self.data_scope,
        })
    }
}

impl FromStr for GrantArg {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, scope) = match s.rsplit_once('@') {
            Some((rest, scope)) => (rest, scope.parse()?),
            None => (s, DataScope::default()),
        };
        let (page, flags) = rest.split_once('=').unwrap_or((rest, "view"));

        let page = if page.starts_with('/') {
            PageRef::Route(page.to_string())
        } else {
            PageRef::Id(page.parse().map_err(|_| {
                AppError::validation(format!("'{page}' is neither a page id nor a route"))
            })?)
        };

        let mut grant = GrantArg {
            page,
            can_view: false,
            can_edit: false,
            can_assign: false,
            data_scope: scope,
        };
        for flag in flags.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            match flag {
                "view" => grant.can_view = true,
                "edit" => grant.can_edit = true,
                "assign" => grant.can_assign = true,
                "none" => {}
                other => {
                    return Err(AppError::validation(format!(
                        "Unknown capability '{other}'. Expected view, edit, assign or none"
                    )));
                }
            }
        }
        Ok(grant)
    }
}

/// Permission display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    /// Page ID
    page_id: i64,
    /// Route
    route: String,
    /// View
    view: bool,
    /// Edit
    edit: bool,
    /// Assign
    assign: bool,
    /// Data scope
    scope: String,
}

/// Execute permission commands
pub async fn execute(
    args: &PermissionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let catalog = super::configured_catalog(config)?;
    let repos = super::repositories(config).await?;
    let permissions = &repos.permissions;

    match &args.command {
        PermissionCommand::Show { role } => {
            let set = permissions.get_permissions(*role).await?;
            print_set(&set, &catalog, format);
        }
        PermissionCommand::Set {
            role,
            grants,
            expected_version,
            force,
        } => {
            let entries = grants
                .iter()
                .map(|g| g.to_entry(&catalog))
                .collect::<AppResult<Vec<_>>>()?;
            if entries.is_empty()
                && !super::confirm(&format!("Revoke every page permission of role {role}?"), *force)?
            {
                return Ok(());
            }
            let set = permissions
                .set_permissions(*role, &entries, *expected_version)
                .await?;
            print_set(&set, &catalog, format);
            output::print_success(&format!("Permission set replaced (version {})", set.version));
        }
        PermissionCommand::GrantAll { role, force } => {
            let prompt = format!(
                "Grant full access with 'all' scope on {} page(s) to role {role}?",
                catalog.pages().len()
            );
            if !super::confirm(&prompt, *force)? {
                return Ok(());
            }
            let entries: Vec<PagePermission> = catalog
                .pages()
                .iter()
                .map(|p| PagePermission::full(p.id))
                .collect();
            let set = permissions.set_permissions(*role, &entries, None).await?;
            print_set(&set, &catalog, format);
            output::print_success(&format!("Permission set replaced (version {})", set.version));
        }
    }

    Ok(())
}

fn print_set(set: &PermissionSet, catalog: &Catalog, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_item(set, &[], format),
        OutputFormat::Table => {
            output::print_kv("Role", &set.role_id.to_string());
            output::print_kv("Version", &set.version.to_string());
            let rows: Vec<PermissionRow> = set
                .entries
                .iter()
                .map(|e| PermissionRow {
                    page_id: e.page_id.get(),
                    route: catalog
                        .page(e.page_id)
                        .map(|p| p.route.clone())
                        .unwrap_or_else(|| "(undeclared)".to_string()),
                    view: e.can_view,
                    edit: e.can_edit,
                    assign: e.can_assign,
                    scope: e.data_scope.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }
}
