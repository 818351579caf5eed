//! Admin API authorization and lifecycle.

use rolegate_core::error::ErrorKind;
use rolegate_core::types::{DepartmentId, PageId, UserId};
use rolegate_entity::permission::{DataScope, PagePermission};
use rolegate_entity::role::{CreateRole, UpdateRole};
use rolegate_service::RequestContext;

use crate::helpers::{CREATORS, ROLES, TestApp, grant};

fn named(name: &str) -> CreateRole {
    CreateRole {
        name: name.to_string(),
        description: Some(format!("{name} team")),
    }
}

#[tokio::test]
async fn test_read_modify_write_with_version_token() {
    let app = TestApp::new().await;
    let role = app.role_with("Support", &[grant(CREATORS, true, false, false, DataScope::Own)]).await;
    let perms = &app.engine.permissions;

    let current = perms.get_role_permissions(&app.admin, role).await.unwrap();
    let mut entries: Vec<PagePermission> = current.entries.iter().copied().map(Into::into).collect();
    entries[0].can_edit = true;

    let updated = perms
        .replace_role_permissions(&app.admin, role, &entries, Some(current.version))
        .await
        .unwrap();
    assert_eq!(updated.version, current.version + 1);

    // Reusing the old token loses.
    let err = perms
        .replace_role_permissions(&app.admin, role, &[], Some(current.version))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.is_recoverable());
    assert_eq!(perms.get_role_permissions(&app.admin, role).await.unwrap(), updated);
}

#[tokio::test]
async fn test_delegated_admin_rights_follow_role_page_grants() {
    let app = TestApp::new().await;
    let editor_role = app
        .role_with("RoleEditor", &[grant(ROLES, true, true, false, DataScope::Own)])
        .await;
    let editor = RequestContext::new(UserId::new(), vec![editor_role]);

    let created = app.engine.roles.create_role(&editor, named("Interns")).await.unwrap();
    let err = app
        .engine
        .permissions
        .replace_role_permissions(&editor, created.id, &[PagePermission::full(CREATORS)], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // Granting assign on the role-management page takes effect on the next call.
    app.engine
        .permissions
        .replace_role_permissions(
            &app.admin,
            editor_role,
            &[grant(ROLES, true, true, true, DataScope::Own)],
            None,
        )
        .await
        .unwrap();
    app.engine
        .permissions
        .replace_role_permissions(&editor, created.id, &[PagePermission::full(CREATORS)], None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_outsider_is_forbidden_everywhere() {
    let app = TestApp::new().await;
    let outsider = RequestContext::new(UserId::new(), vec![]);
    let engine = &app.engine;

    let errors = [
        engine.roles.list_roles(&outsider).await.map(|_| ()).unwrap_err(),
        engine.roles.create_role(&outsider, named("X")).await.map(|_| ()).unwrap_err(),
        engine.catalog.list_pages(&outsider).await.map(|_| ()).unwrap_err(),
        engine.catalog.grouped_pages(&outsider).await.map(|_| ()).unwrap_err(),
        engine
            .permissions
            .get_role_permissions(&outsider, app.admin.role_ids[0])
            .await
            .map(|_| ())
            .unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }
}

#[tokio::test]
async fn test_role_names_are_unique_and_validated() {
    let app = TestApp::new().await;
    let roles = &app.engine.roles;
    let sales = roles.create_role(&app.admin, named("Sales")).await.unwrap();

    let dup = roles.create_role(&app.admin, named("  sales ")).await.unwrap_err();
    assert_eq!(dup.kind, ErrorKind::Conflict);

    let blank = roles.create_role(&app.admin, named("   ")).await.unwrap_err();
    assert_eq!(blank.kind, ErrorKind::Validation);

    let renamed = roles
        .update_role(
            &app.admin,
            sales.id,
            UpdateRole {
                name: Some("Sales EMEA".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(renamed.updated_at >= sales.updated_at);
    assert_eq!(roles.get_role(&app.admin, sales.id).await.unwrap().name, "Sales EMEA");

    let clash = roles
        .update_role(
            &app.admin,
            sales.id,
            UpdateRole {
                name: Some("administrator".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(clash.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_catalog_listings_group_by_department() {
    let app = TestApp::new().await;
    let grouped = app.engine.catalog.grouped_pages(&app.admin).await.unwrap();

    let unassigned: Vec<PageId> = grouped[&DepartmentId::UNASSIGNED].iter().map(|p| p.id).collect();
    assert_eq!(unassigned, vec![PageId(1), ROLES]);
    assert_eq!(grouped[&DepartmentId(1)][0].id, CREATORS);
    assert_eq!(app.engine.catalog.list_departments(&app.admin).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_page_in_new_set_is_rejected() {
    let app = TestApp::new().await;
    let role = app.role_with("Ops", &[]).await;
    let err = app
        .engine
        .permissions
        .replace_role_permissions(
            &app.admin,
            role,
            &[PagePermission::full(CREATORS), PagePermission::full(PageId(404))],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(
        app.engine
            .permissions
            .get_role_permissions(&app.admin, role)
            .await
            .unwrap()
            .is_empty()
    );
}
