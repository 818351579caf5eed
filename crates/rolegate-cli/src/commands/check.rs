//! Effective access check, evaluated the way the request path does.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;

use rolegate_auth::StaticHierarchy;
use rolegate_cache::CacheManager;
use rolegate_core::config::AppConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::{PageId, RoleId, UserId};
use rolegate_entity::permission::AccessDecision;
use rolegate_service::AccessServices;

use crate::output::{self, OutputFormat};

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Acting user ID
    #[arg(short, long)]
    pub user: UserId,
    /// Role held by the user (repeatable)
    #[arg(short, long = "role")]
    pub roles: Vec<RoleId>,
    /// Page ID to check
    #[arg(long, conflicts_with = "route", required_unless_present = "route")]
    pub page: Option<PageId>,
    /// Page route to check
    #[arg(long)]
    pub route: Option<String>,
    /// Owner of the record being accessed; enables the data-scope check
    #[arg(long)]
    pub owner: Option<UserId>,
    /// Direct report of the acting user (repeatable), consulted for `subordinates` scope
    #[arg(long = "report")]
    pub reports: Vec<UserId>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    user_id: UserId,
    page_id: PageId,
    route: String,
    decision: AccessDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    record_allowed: Option<bool>,
}

/// Execute the check command
pub async fn execute(args: &CheckArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let catalog = super::configured_catalog(config)?;
    let repos = super::repositories(config).await?;
    let hierarchy = StaticHierarchy::from_pairs(args.reports.iter().map(|r| (args.user, *r)));

    let page = match (&args.page, &args.route) {
        (Some(id), _) => catalog.require_page(*id)?.clone(),
        (None, Some(route)) => catalog.require_route(route)?.clone(),
        (None, None) => return Err(AppError::validation("Either --page or --route is required")),
    };

    let engine = AccessServices::build(
        &config.access,
        catalog,
        repos.roles,
        repos.permissions,
        CacheManager::new(&config.cache)?,
        Arc::new(hierarchy),
    )?;

    let decision = engine.resolve(args.user, page.id, &args.roles).await?;
    let record_allowed = match args.owner {
        Some(owner) => Some(engine.scope_allows(&decision, args.user, owner).await),
        None => None,
    };

    let report = CheckReport {
        user_id: args.user,
        page_id: page.id,
        route: page.route,
        decision,
        owner_id: args.owner,
        record_allowed,
    };

    let mut pairs = vec![
        ("User", report.user_id.to_string()),
        ("Page", format!("{} ({})", report.page_id, report.route)),
        ("View", decision.can_view.to_string()),
        ("Edit", decision.can_edit.to_string()),
        ("Assign", decision.can_assign.to_string()),
        ("Data scope", decision.data_scope.to_string()),
    ];
    if let (Some(owner), Some(allowed)) = (report.owner_id, report.record_allowed) {
        pairs.push(("Owner", owner.to_string()));
        pairs.push(("Record allowed", allowed.to_string()));
    }
    output::print_item(&report, &pairs, format);

    Ok(())
}
