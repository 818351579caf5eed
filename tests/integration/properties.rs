//! Storage and merge properties of the permission engine.

use rolegate_core::error::ErrorKind;
use rolegate_core::types::{PageId, RoleId, UserId};
use rolegate_database::PermissionStore;
use rolegate_entity::permission::{AccessDecision, DataScope};

use crate::helpers::{CALENDAR, CREATORS, DASHBOARD, TestApp, grant};

#[tokio::test]
async fn test_page_ids_stay_unique_across_replacements() {
    let app = TestApp::new().await;
    let role = app.role_with("Churn", &[]).await;

    let batches = [
        vec![
            grant(CREATORS, true, false, false, DataScope::Own),
            grant(CREATORS, false, true, false, DataScope::All),
            grant(DASHBOARD, true, false, false, DataScope::Own),
        ],
        vec![grant(CALENDAR, true, false, false, DataScope::Own)],
        vec![
            grant(CALENDAR, true, true, false, DataScope::Own),
            grant(DASHBOARD, true, false, false, DataScope::Own),
            grant(CALENDAR, true, false, true, DataScope::Subordinates),
        ],
    ];
    for batch in &batches {
        app.engine
            .permissions
            .replace_role_permissions(&app.admin, role, batch, None)
            .await
            .unwrap();
    }

    let set = app.store.get_permissions(role).await.unwrap();
    let pages: Vec<PageId> = set.entries.iter().map(|e| e.page_id).collect();
    assert_eq!(pages, vec![DASHBOARD, CALENDAR]);
    let calendar = set.entry_for(CALENDAR).unwrap();
    assert!(calendar.can_assign && !calendar.can_edit);
    assert_eq!(calendar.data_scope, DataScope::Subordinates);
    assert_eq!(set.version, 4);
}

#[tokio::test]
async fn test_delete_leaves_no_rows_behind() {
    let app = TestApp::new().await;
    let role = app
        .role_with(
            "Doomed",
            &[
                grant(CREATORS, true, true, true, DataScope::All),
                grant(CALENDAR, true, false, false, DataScope::Own),
            ],
        )
        .await;
    let rows_before = app.store.total_rows().await;

    app.engine.roles.delete_role(&app.admin, role).await.unwrap();

    assert_eq!(app.store.row_count_for_role(role).await, 0);
    assert_eq!(app.store.total_rows().await, rows_before - 2);
    assert!(app.store.get_permissions(role).await.unwrap().is_empty());

    let err = app.engine.roles.delete_role(&app.admin, role).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_edit_or_assign_implies_view() {
    let app = TestApp::new().await;
    let editor = app.role_with("EditOnly", &[grant(CREATORS, false, true, false, DataScope::Own)]).await;
    let assigner = app
        .role_with("AssignOnly", &[grant(CALENDAR, false, false, true, DataScope::Own)])
        .await;
    let user = UserId::new();

    assert!(app.engine.resolve(user, CREATORS, &[editor]).await.unwrap().can_view);
    assert!(app.engine.resolve(user, CALENDAR, &[assigner]).await.unwrap().can_view);
}

#[tokio::test]
async fn test_most_permissive_merge_across_roles() {
    let app = TestApp::new().await;
    let a = app.role_with("A", &[grant(CREATORS, true, false, false, DataScope::All)]).await;
    let b = app
        .role_with("B", &[grant(CREATORS, false, true, false, DataScope::Subordinates)])
        .await;
    let c = app.role_with("C", &[grant(CREATORS, false, false, true, DataScope::Own)]).await;
    let user = UserId::new();

    let merged = app.engine.resolve(user, CREATORS, &[a, b, c]).await.unwrap();
    assert_eq!(
        merged,
        AccessDecision {
            can_view: true,
            can_edit: true,
            can_assign: true,
            data_scope: DataScope::All,
        }
    );

    // Order of roles does not matter.
    assert_eq!(app.engine.resolve(user, CREATORS, &[c, b, a]).await.unwrap(), merged);
}

#[tokio::test]
async fn test_deny_by_default() {
    let app = TestApp::new().await;
    let other_page = app.role_with("Elsewhere", &[grant(CALENDAR, true, true, true, DataScope::All)]).await;
    let user = UserId::new();

    for roles in [vec![], vec![RoleId::new()], vec![other_page]] {
        assert_eq!(
            app.engine.resolve(user, CREATORS, &roles).await.unwrap(),
            AccessDecision::deny()
        );
    }
}

#[tokio::test]
async fn test_concurrent_writers_from_same_version() {
    let app = TestApp::new().await;
    let role = app.role_with("Contested", &[]).await;
    let version = app
        .engine
        .permissions
        .get_role_permissions(&app.admin, role)
        .await
        .unwrap()
        .version;

    let left = [grant(CREATORS, true, false, false, DataScope::Own)];
    let right = [grant(CALENDAR, true, true, false, DataScope::All)];
    let (a, b) = futures::join!(
        app.engine
            .permissions
            .replace_role_permissions(&app.admin, role, &left, Some(version)),
        app.engine
            .permissions
            .replace_role_permissions(&app.admin, role, &right, Some(version)),
    );

    let winner = match (a, b) {
        (Ok(set), Err(err)) | (Err(err), Ok(set)) => {
            assert_eq!(err.kind, ErrorKind::Conflict);
            set
        }
        other => panic!("expected exactly one success: {other:?}"),
    };
    assert_eq!(winner.version, version + 1);
    assert_eq!(app.store.get_permissions(role).await.unwrap(), winner);
}
