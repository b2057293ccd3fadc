pub mod contact;
pub mod listing;
pub mod schema;

use std::sync::Arc;

use anyhow::{Context, Result};
use diesel::{Connection, PgConnection};

use crate::config::Config;

pub fn establish_connection(config: &Arc<Config>) -> Result<PgConnection> {
    PgConnection::establish(&config.db_path)
        .with_context(|| format!("error connecting to {}", config.db_path))
}
