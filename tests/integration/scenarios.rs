//! Request-path scenarios.

use std::time::Duration;

use async_trait::async_trait;

use rolegate_auth::StaticHierarchy;
use rolegate_core::error::ErrorKind;
use rolegate_core::result::AppResult;
use rolegate_core::traits::HierarchyLookup;
use rolegate_core::types::UserId;
use rolegate_entity::permission::{AccessDecision, DataScope};

use crate::helpers::{CALENDAR, CREATORS, DASHBOARD, ROLES, TestApp, grant};

#[tokio::test]
async fn test_role_without_entries_denies_everything() {
    let app = TestApp::new().await;
    let blank = app.role_with("Blank", &[]).await;
    let user = UserId::new();

    for page in [DASHBOARD, CREATORS, CALENDAR, ROLES] {
        let decision = app.engine.resolve(user, page, &[blank]).await.unwrap();
        assert_eq!(decision, AccessDecision::deny());
        assert_eq!(decision.data_scope, DataScope::Own);
    }
    assert!(app.engine.resolver.visible_pages(user, &[blank]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_manager_sees_own_and_subordinate_records_only() {
    let (manager, report, stranger) = (UserId::new(), UserId::new(), UserId::new());
    let app = TestApp::with_hierarchy(StaticHierarchy::from_pairs([(manager, report)])).await;
    let role = app
        .role_with("Manager", &[grant(CREATORS, true, true, false, DataScope::Subordinates)])
        .await;

    let decision = app.engine.resolve(manager, CREATORS, &[role]).await.unwrap();
    assert!(decision.can_view && decision.can_edit && !decision.can_assign);
    assert_eq!(decision.data_scope, DataScope::Subordinates);

    assert!(app.engine.scope_allows(&decision, manager, manager).await);
    assert!(app.engine.scope_allows(&decision, manager, report).await);
    assert!(!app.engine.scope_allows(&decision, manager, stranger).await);
}

#[tokio::test]
async fn test_deleted_role_grants_nothing() {
    let app = TestApp::new().await;
    let role = app
        .role_with("Temp", &[grant(CALENDAR, true, true, true, DataScope::All)])
        .await;
    let user = UserId::new();
    assert!(app.engine.resolve(user, CALENDAR, &[role]).await.unwrap().can_assign);

    app.engine.roles.delete_role(&app.admin, role).await.unwrap();

    assert_eq!(
        app.engine.resolve(user, CALENDAR, &[role]).await.unwrap(),
        AccessDecision::deny()
    );
    let set = app
        .engine
        .permissions
        .get_role_permissions(&app.admin, role)
        .await
        .unwrap();
    assert!(set.is_empty());
    assert_eq!(set.version, 0);
}

#[tokio::test]
async fn test_visible_pages_build_navigation() {
    let app = TestApp::new().await;
    let agent = app
        .role_with(
            "Agent",
            &[
                grant(DASHBOARD, true, false, false, DataScope::Own),
                grant(CREATORS, false, false, true, DataScope::Own),
                grant(CALENDAR, false, false, false, DataScope::All),
            ],
        )
        .await;

    let menu = app
        .engine
        .resolver
        .visible_pages(UserId::new(), &[agent])
        .await
        .unwrap();
    let routes: Vec<&str> = menu.iter().map(|a| a.page.route.as_str()).collect();
    assert_eq!(routes, vec!["/dashboard", "/creators"]);
    assert!(menu[1].decision.can_view);
}

struct StalledDirectory;

#[async_trait]
impl HierarchyLookup for StalledDirectory {
    async fn is_manager_of(&self, _manager: UserId, _employee: UserId) -> AppResult<bool> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(true)
    }
}

#[tokio::test(start_paused = true)]
async fn test_hierarchy_timeout_denies_subordinate_access() {
    let app = TestApp::with_hierarchy(StalledDirectory).await;
    let role = app
        .role_with("Lead", &[grant(CREATORS, true, false, false, DataScope::Subordinates)])
        .await;
    let lead = UserId::new();

    let decision = app.engine.resolve(lead, CREATORS, &[role]).await.unwrap();
    assert!(!app.engine.scope_allows(&decision, lead, UserId::new()).await);
    assert!(app.engine.scope_allows(&decision, lead, lead).await);
}

#[tokio::test]
async fn test_storage_outage_is_unavailable() {
    let app = TestApp::new().await;
    let role = app
        .role_with("Viewer", &[grant(DASHBOARD, true, false, false, DataScope::Own)])
        .await;
    app.store.set_available(false);

    // Nothing about this role is cached yet.
    let err = app
        .engine
        .resolve(UserId::new(), DASHBOARD, &[role])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let app = TestApp::new().await;
    let err = app
        .engine
        .resolver
        .resolve_route(UserId::new(), "/missing", &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
