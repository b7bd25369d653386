//! Lifecycle-managed MongoDB connection.
//!
//! The connector is built once at startup and shared by every repository.
//! The client is opened on the first `connect()` and reused afterwards.

use log::{debug, info, warn};
use mongodb::bson::doc;
use mongodb::{Client, Database};
use tokio::sync::OnceCell;

use crate::constants::{CODE_DB_CONNECTION_FAILED, CODE_DB_NOT_CONNECTED, ERR_DB_NOT_CONNECTED};
use crate::errors::{connection_error, ApiError};

pub struct DbConnector {
    uri: Option<String>,
    database_name: String,
    database: OnceCell<Database>,
}

impl DbConnector {
    pub fn new(uri: Option<String>, database_name: impl Into<String>) -> Self {
        Self {
            uri: uri.filter(|uri| !uri.trim().is_empty()),
            database_name: database_name.into(),
            database: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }

    /// Open the connection if it is not already open.
    ///
    /// A missing connection string is not an error here: it is logged and the
    /// connector stays unconnected, so every later `database()` call fails
    /// with `DB_NOT_CONNECTED`.
    pub async fn connect(&self) -> Result<(), ApiError> {
        let Some(uri) = self.uri.as_deref() else {
            warn!("MONGODB_URI not found, database operations will fail");
            return Ok(());
        };

        if self.is_connected() {
            debug!("Already connected to MongoDB");
            return Ok(());
        }

        self.database
            .get_or_try_init(|| open(uri, &self.database_name))
            .await?;
        Ok(())
    }

    /// Return the live database handle, connecting first if needed.
    pub async fn database(&self) -> Result<Database, ApiError> {
        self.connect().await?;
        self.database.get().cloned().ok_or_else(|| ApiError::ServiceUnavailable {
            code: CODE_DB_NOT_CONNECTED.to_string(),
            message: ERR_DB_NOT_CONNECTED.to_string(),
        })
    }

    /// Close the client. Called once when the server stops.
    pub async fn shutdown(&self) {
        if let Some(db) = self.database.get() {
            info!("Closing MongoDB connection...");
            db.client().clone().shutdown().await;
        }
    }
}

async fn open(uri: &str, database_name: &str) -> Result<Database, ApiError> {
    info!("Connecting to MongoDB...");
    let client = Client::with_uri_str(uri).await.map_err(|e| {
        log::error!("Error connecting to MongoDB: {}", e);
        connection_error(CODE_DB_CONNECTION_FAILED, e)
    })?;

    let db = client.database(database_name);
    db.run_command(doc! { "ping": 1 }).await.map_err(|e| {
        log::error!("Error pinging MongoDB: {}", e);
        connection_error(CODE_DB_CONNECTION_FAILED, e)
    })?;

    info!("Connected to MongoDB successfully!");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_missing_uri_is_soft_failure() {
        let connector = DbConnector::new(None, "threads_test");

        assert!(connector.connect().await.is_ok());
        assert!(!connector.is_connected());
    }

    #[actix_web::test]
    async fn test_blank_uri_counts_as_missing() {
        let connector = DbConnector::new(Some("   ".to_string()), "threads_test");

        assert!(connector.connect().await.is_ok());
        assert!(!connector.is_connected());
    }

    #[actix_web::test]
    async fn test_queries_fail_when_unconnected() {
        let connector = DbConnector::new(None, "threads_test");

        let err = connector.database().await.unwrap_err();
        assert_eq!(err.code(), CODE_DB_NOT_CONNECTED);
    }

    #[actix_web::test]
    async fn test_malformed_uri_raises_connection_error() {
        let connector = DbConnector::new(Some("not-a-mongo-uri".to_string()), "threads_test");

        let err = connector.connect().await.unwrap_err();
        assert_eq!(err.code(), CODE_DB_CONNECTION_FAILED);
        assert!(!connector.is_connected());
    }
}
