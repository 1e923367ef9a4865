use std::sync::Arc;

use crate::{
    config::Config,
    database::Database,
    services::{PostService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub users: UserService,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Connect and create the schema up front so a bad database
        // configuration fails the process at startup, not per request.
        let database = Database::connect(&config.database.url).await?;
        database.init().await?;
        Ok(Self::with_database(Arc::new(database), config))
    }

    /// Explicit wiring of services to the shared store handle.
    pub fn with_database(database: Arc<Database>, config: Config) -> Self {
        Self {
            posts: PostService::new(database.clone()),
            users: UserService::new(database),
            config,
        }
    }
}
