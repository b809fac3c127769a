//! Shared application state handed to every handler.

use std::sync::Arc;

use stockwise_auth::{AccountService, AuthService};
use stockwise_db::DbManager;
use stockwise_db::repository::{
    SurrealActivityRepository, SurrealProductRepository, SurrealSessionRepository,
    SurrealUserRepository,
};
use stockwise_inventory::InventoryService;
use surrealdb::engine::any::Any;

use crate::config::ServerConfig;

pub type Accounts = AccountService<SurrealUserRepository<Any>, SurrealSessionRepository<Any>>;
pub type Auth = AuthService<SurrealUserRepository<Any>, SurrealSessionRepository<Any>>;
pub type Inventory = InventoryService<SurrealProductRepository<Any>, SurrealActivityRepository<Any>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbManager,
    pub accounts: Arc<Accounts>,
    pub auth: Arc<Auth>,
    pub inventory: Arc<Inventory>,
    pub cookies: CookieSettings,
}

/// Attributes of the session cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub secure: bool,
    pub max_age_secs: u64,
}

impl AppState {
    /// Wire repositories and services over an open connection.
    pub fn new(db: DbManager, config: &ServerConfig) -> Self {
        let client = db.client().clone();

        let users = match &config.auth.pepper {
            Some(pepper) => SurrealUserRepository::with_pepper(client.clone(), pepper.clone()),
            None => SurrealUserRepository::new(client.clone()),
        };
        let sessions = SurrealSessionRepository::new(client.clone());

        let accounts = AccountService::new(users.clone(), sessions.clone(), config.auth.clone());
        let auth = AuthService::new(users, sessions, config.auth.clone());
        let inventory = InventoryService::new(
            SurrealProductRepository::new(client.clone()),
            SurrealActivityRepository::new(client),
            config.inventory.clone(),
        );

        Self {
            db,
            accounts: Arc::new(accounts),
            auth: Arc::new(auth),
            inventory: Arc::new(inventory),
            cookies: CookieSettings {
                secure: config.secure_cookies,
                max_age_secs: config.auth.session_lifetime_secs,
            },
        }
    }
}
