//! Role management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use rolegate_core::config::AppConfig;
use rolegate_core::result::AppResult;
use rolegate_core::types::RoleId;
use rolegate_database::RoleStore;
use rolegate_entity::role::{CreateRole, Role, UpdateRole};

use crate::output::{self, OutputFormat};

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// List all roles
    List,
    /// Create a role
    Create {
        /// Role name (unique, case-insensitive)
        name: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Update a role
    Update {
        /// Role ID
        id: RoleId,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Activate (`true`) or retire (`false`) the role
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a role and all of its permissions
    Delete {
        /// Role ID
        id: RoleId,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role ID
    id: String,
    /// Name
    name: String,
    /// Description
    description: String,
    /// Status
    status: String,
    /// Updated at
    updated_at: String,
}

impl From<&Role> for RoleRow {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.to_string(),
            name: role.name.clone(),
            description: role.description.clone().unwrap_or_default(),
            status: if role.is_active { "active" } else { "retired" }.to_string(),
            updated_at: role.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute role commands
pub async fn execute(args: &RoleArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let repos = super::repositories(config).await?;
    let roles = &repos.roles;

    match &args.command {
        RoleCommand::List => {
            let rows: Vec<RoleRow> = roles.list_roles().await?.iter().map(RoleRow::from).collect();
            output::print_list(&rows, format);
        }
        RoleCommand::Create { name, description } => {
            let role = roles
                .create_role(CreateRole {
                    name: name.clone(),
                    description: description.clone(),
                })
                .await?;
            print_role(&role, format);
            output::print_success(&format!("Role '{}' created", role.name));
        }
        RoleCommand::Update {
            id,
            name,
            description,
            active,
        } => {
            let role = roles
                .update_role(
                    *id,
                    UpdateRole {
                        name: name.clone(),
                        description: description.clone(),
                        is_active: *active,
                    },
                )
                .await?;
            print_role(&role, format);
            output::print_success(&format!("Role '{}' updated", role.name));
        }
        RoleCommand::Delete { id, force } => {
            let prompt = format!("Delete role {id} and revoke all of its page permissions?");
            if !super::confirm(&prompt, *force)? {
                return Ok(());
            }
            roles.delete_role(*id).await?;
            output::print_success(&format!("Role {id} deleted"));
        }
    }

    Ok(())
}

fn print_role(role: &Role, format: OutputFormat) {
    output::print_item(
        role,
        &[
            ("ID", role.id.to_string()),
            ("Name", role.name.clone()),
            ("Description", role.description.clone().unwrap_or_default()),
            ("Active", role.is_active.to_string()),
        ],
        format,
    );
}
