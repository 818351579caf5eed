//! Shared test helpers for integration tests.

use std::sync::Arc;

use rolegate::entity::{Catalog, CreateRole};
use rolegate::{
    AccessServices, AppConfig, CacheManager, DataScope, HierarchyLookup, InMemoryStore,
    PageId, PagePermission, PermissionStore, RequestContext, RoleId, RoleStore,
    StaticHierarchy, UserId,
};

pub const DASHBOARD: PageId = PageId(1);
pub const CREATORS: PageId = PageId(10);
pub const CALENDAR: PageId = PageId(20);
pub const ROLES: PageId = PageId(90);

const TEST_CONFIG: &str = r#"
    [database]
    url = "postgres://unused@localhost/unused"

    [access]
    role_management_route = "/settings/roles"
    hierarchy_timeout_ms = 200

    [[catalog.departments]]
    id = 1
    name = "Talent"

    [[catalog.departments]]
    id = 2
    name = "Operations"

    [[catalog.pages]]
    id = 1
    name = "Dashboard"
    route = "/dashboard"

    [[catalog.pages]]
    id = 10
    name = "Creators"
    route = "/creators"
    department_id = 1

    [[catalog.pages]]
    id = 20
    name = "Content Calendar"
    route = "/calendar"
    department_id = 2

    [[catalog.pages]]
    id = 90
    name = "Roles & Permissions"
    route = "/settings/roles"
"#;

/// Test application context
pub struct TestApp {
    /// Backing store, for direct inspection
    pub store: InMemoryStore,
    /// The engine under test
    pub engine: AccessServices,
    /// An actor holding full rights on every page
    pub admin: RequestContext,
}

impl TestApp {
    /// Create a test application with an empty hierarchy
    pub async fn new() -> Self {
        Self::with_hierarchy(StaticHierarchy::new()).await
    }

    /// Create a test application consulting `hierarchy` for `subordinates` scope
    pub async fn with_hierarchy(hierarchy: impl HierarchyLookup) -> Self {
        let config = AppConfig::from_toml(TEST_CONFIG).expect("Failed to parse test config");
        let catalog = Catalog::from_config(&config.catalog).expect("Invalid test catalog");
        let store = InMemoryStore::with_catalog(catalog.clone());

        let engine = AccessServices::build(
            &config.access,
            catalog.clone(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            CacheManager::new(&config.cache).expect("Failed to init cache"),
            Arc::new(hierarchy),
        )
        .expect("Failed to build engine");

        // Bootstrap: the first administrator is seeded below the admin API.
        let admin_role = store
            .create_role(CreateRole {
                name: "Administrator".to_string(),
                description: None,
            })
            .await
            .expect("Failed to create admin role");
        let everything: Vec<PagePermission> =
            catalog.pages().iter().map(|p| PagePermission::full(p.id)).collect();
        store
            .set_permissions(admin_role.id, &everything, None)
            .await
            .expect("Failed to grant admin role");

        Self {
            store,
            engine,
            admin: RequestContext::new(UserId::new(), vec![admin_role.id]),
        }
    }

    /// Create a role through the admin API and give it `grants`
    pub async fn role_with(&self, name: &str, grants: &[PagePermission]) -> RoleId {
        let role = self
            .engine
            .roles
            .create_role(
                &self.admin,
                CreateRole {
                    name: name.to_string(),
                    description: None,
                },
            )
            .await
            .expect("Failed to create role");
        self.engine
            .permissions
            .replace_role_permissions(&self.admin, role.id, grants, None)
            .await
            .expect("Failed to set role permissions");
        role.id
    }
}

/// Build one grant
pub fn grant(page: PageId, view: bool, edit: bool, assign: bool, scope: DataScope) -> PagePermission {
    PagePermission {
        page_id: page,
        can_view: view,
        can_edit: edit,
        can_assign: assign,
        data_scope: scope,
    }
}
