#![cfg(feature = "pg-tests")]

use std::time::Duration;

use rolegate_core::config::DatabaseConfig;
use rolegate_core::error::ErrorKind;
use rolegate_core::types::{DepartmentId, PageId, RoleId};
use rolegate_database::migration::run_migrations;
use rolegate_database::{
    CatalogRepository, CatalogStore, DatabasePool, PermissionStore, RolePermissionRepository,
    RoleRepository, RoleStore,
};
use rolegate_entity::catalog::{Catalog, Department, Page};
use rolegate_entity::permission::{DataScope, PagePermission};
use rolegate_entity::role::{CreateRole, UpdateRole};

static PG_POOL: tokio::sync::OnceCell<DatabasePool> = tokio::sync::OnceCell::const_new();

/// Held by tests that read or reshape the shared catalog.
static CATALOG_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

fn catalog() -> Catalog {
    Catalog::new(
        vec![Department {
            id: DepartmentId(1),
            name: "Operations".to_string(),
            description: None,
        }],
        (1..=4)
            .map(|id| Page {
                id: PageId(id),
                name: format!("Page {id}"),
                route: format!("/pg-page-{id}"),
                department_id: (id % 2 == 0).then_some(DepartmentId(1)),
            })
            .collect(),
    )
    .expect("valid catalog")
}

async fn pg_pool() -> Option<DatabasePool> {
    let url = match std::env::var("ROLEGATE_TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping pg-tests: set ROLEGATE_TEST_DATABASE_URL");
            return None;
        }
    };
    let config = DatabaseConfig {
        url,
        max_connections: 10,
        min_connections: 1,
        connect_timeout_seconds: 2,
        idle_timeout_seconds: 60,
    };
    let pool = PG_POOL
        .get_or_try_init(|| async {
            let db = tokio::time::timeout(Duration::from_secs(5), DatabasePool::connect(&config))
                .await
                .map_err(|_| "connect timed out".to_string())?
                .map_err(|e| e.to_string())?;
            run_migrations(db.pool()).await.map_err(|e| e.to_string())?;
            sqlx::query("TRUNCATE role_permissions, roles, pages, departments")
                .execute(db.pool())
                .await
                .map_err(|e| e.to_string())?;
            CatalogRepository::new(db.pool().clone())
                .sync_catalog(&catalog())
                .await
                .map_err(|e| e.to_string())?;
            Ok::<_, String>(db)
        })
        .await;
    match pool {
        Ok(pool) => Some(pool.clone()),
        Err(err) => {
            eprintln!("skipping pg-tests: cannot prepare postgres: {err}");
            None
        }
    }
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", RoleId::new())
}

fn grant(page: i64, edit: bool, scope: DataScope) -> PagePermission {
    PagePermission {
        page_id: PageId(page),
        can_view: true,
        can_edit: edit,
        can_assign: false,
        data_scope: scope,
    }
}

#[tokio::test]
async fn test_catalog_round_trips_through_tables() {
    let Some(db) = pg_pool().await else { return };
    let _guard = CATALOG_LOCK.lock().await;
    let loaded = CatalogRepository::new(db.pool().clone())
        .load_catalog()
        .await
        .expect("load catalog");
    assert_eq!(loaded.pages(), catalog().pages());
    assert_eq!(loaded.departments(), catalog().departments());
}

#[tokio::test]
async fn test_role_names_are_unique_ignoring_case() {
    let Some(db) = pg_pool().await else { return };
    let roles = RoleRepository::new(db.pool().clone());
    let name = unique_name("Sales");
    roles
        .create_role(CreateRole {
            name: name.clone(),
            description: None,
        })
        .await
        .expect("create");

    let err = roles
        .create_role(CreateRole {
            name: name.to_uppercase(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_replace_set_and_version_check() {
    let Some(db) = pg_pool().await else { return };
    let roles = RoleRepository::new(db.pool().clone());
    let perms = RolePermissionRepository::new(db.pool().clone());
    let role = roles
        .create_role(CreateRole {
            name: unique_name("Editors"),
            description: None,
        })
        .await
        .expect("create");

    let first = perms
        .set_permissions(role.id, &[grant(1, false, DataScope::Own), grant(2, true, DataScope::All)], Some(0))
        .await
        .expect("first write");
    assert_eq!(first.version, 1);

    let stale = perms
        .set_permissions(role.id, &[grant(3, false, DataScope::Own)], Some(0))
        .await
        .unwrap_err();
    assert_eq!(stale.kind, ErrorKind::Conflict);

    let missing_page = perms
        .set_permissions(role.id, &[grant(99, false, DataScope::Own)], Some(1))
        .await
        .unwrap_err();
    assert_eq!(missing_page.kind, ErrorKind::NotFound);

    let stored = perms.get_permissions(role.id).await.expect("read");
    assert_eq!(stored, first);
}

#[tokio::test]
async fn test_concurrent_writers_one_wins() {
    let Some(db) = pg_pool().await else { return };
    let roles = RoleRepository::new(db.pool().clone());
    let perms = RolePermissionRepository::new(db.pool().clone());
    let role = roles
        .create_role(CreateRole {
            name: unique_name("Racers"),
            description: None,
        })
        .await
        .expect("create");

    let left = [grant(1, false, DataScope::Own)];
    let right = [grant(2, false, DataScope::Subordinates)];
    let (a, b) = tokio::join!(
        perms.set_permissions(role.id, &left, Some(0)),
        perms.set_permissions(role.id, &right, Some(0)),
    );
    let winner = match (a, b) {
        (Ok(set), Err(err)) | (Err(err), Ok(set)) => {
            assert_eq!(err.kind, ErrorKind::Conflict);
            set
        }
        other => panic!("expected exactly one winner: {other:?}"),
    };
    assert_eq!(perms.get_permissions(role.id).await.unwrap(), winner);
}

#[tokio::test]
async fn test_delete_cascades_and_inactive_roles_grant_nothing() {
    let Some(db) = pg_pool().await else { return };
    let roles = RoleRepository::new(db.pool().clone());
    let perms = RolePermissionRepository::new(db.pool().clone());

    let doomed = roles
        .create_role(CreateRole {
            name: unique_name("Doomed"),
            description: None,
        })
        .await
        .unwrap();
    let paused = roles
        .create_role(CreateRole {
            name: unique_name("Paused"),
            description: None,
        })
        .await
        .unwrap();
    for id in [doomed.id, paused.id] {
        perms
            .set_permissions(id, &[grant(4, true, DataScope::All)], None)
            .await
            .unwrap();
    }

    roles.delete_role(doomed.id).await.expect("delete");
    assert_eq!(perms.count_rows_for_role(doomed.id).await.unwrap(), 0);
    assert_eq!(
        roles.delete_role(doomed.id).await.unwrap_err().kind,
        ErrorKind::NotFound
    );

    roles
        .update_role(
            paused.id,
            UpdateRole {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let rows = perms
        .permissions_for_page(&[paused.id], PageId(4))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_catalog_sync_advances_versions_of_roles_losing_rows() {
    let Some(db) = pg_pool().await else { return };
    let _guard = CATALOG_LOCK.lock().await;
    let catalogs = CatalogRepository::new(db.pool().clone());
    let roles = RoleRepository::new(db.pool().clone());
    let perms = RolePermissionRepository::new(db.pool().clone());

    let base = catalog();
    let mut pages = base.pages().to_vec();
    pages.push(Page {
        id: PageId(5),
        name: "Page 5".to_string(),
        route: "/pg-page-5".to_string(),
        department_id: None,
    });
    let extended = Catalog::new(base.departments().to_vec(), pages).expect("valid catalog");
    assert!(catalogs.sync_catalog(&extended).await.unwrap().is_empty());

    let mut created = Vec::new();
    for prefix in ["Losing", "Keeping"] {
        created.push(
            roles
                .create_role(CreateRole {
                    name: unique_name(prefix),
                    description: None,
                })
                .await
                .expect("create"),
        );
    }
    let (losing, keeping) = (created[0].id, created[1].id);
    perms
        .set_permissions(losing, &[grant(1, false, DataScope::Own), grant(5, true, DataScope::All)], None)
        .await
        .unwrap();
    perms
        .set_permissions(keeping, &[grant(1, false, DataScope::Own)], None)
        .await
        .unwrap();

    let affected = catalogs.sync_catalog(&base).await.expect("sync back");
    assert_eq!(affected, vec![losing]);

    let set = perms.get_permissions(losing).await.unwrap();
    assert_eq!(set.version, 2);
    assert_eq!(set.entries.len(), 1);
    assert_eq!(perms.get_permissions(keeping).await.unwrap().version, 1);

    let err = perms
        .set_permissions(losing, &[], Some(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}
