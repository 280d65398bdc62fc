//! Memoized connection provider.
//!
//! The first successful connection is kept for the rest of the session and
//! handed to every caller. A failed attempt is remembered too; the session
//! does not retry.

use super::{Connector, DatabaseClient};
use crate::notice::Notices;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Hands out the single database client for a session.
pub struct ConnectionProvider {
    connector: Box<dyn Connector>,
    cell: OnceCell<Option<Arc<dyn DatabaseClient>>>,
}

impl ConnectionProvider {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            cell: OnceCell::new(),
        }
    }

    /// Returns the shared client, connecting on first use.
    ///
    /// On failure an error notice is raised (only on the attempt itself) and
    /// `None` is returned from then on.
    pub async fn get_connection(&self, notices: &mut Notices) -> Option<Arc<dyn DatabaseClient>> {
        let connector = &self.connector;
        self.cell
            .get_or_init(|| async move {
                match connector.connect().await {
                    Ok(client) => {
                        info!("Connected to {}", connector.describe());
                        Some(client)
                    }
                    Err(e) => {
                        notices.error(format!("Failed to connect to the database: {}", e.message()));
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// True once a connection attempt has been made.
    pub fn attempted(&self) -> bool {
        self.cell.initialized()
    }

    /// Display-safe description of the target.
    pub fn describe(&self) -> String {
        self.connector.describe()
    }
}
