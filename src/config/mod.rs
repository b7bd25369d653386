use std::env;

use lazy_static::lazy_static;

lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Connection string for the document store. `None` leaves the
    /// connector unconnected; see `database::DbConnector::connect`.
    pub mongodb_uri: Option<String>,
    pub database_name: String,
    /// Shared secret used to verify session tokens issued by the identity provider.
    pub identity_token_secret: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(8080),
            mongodb_uri: env::var("MONGODB_URI")
                .ok()
                .filter(|uri| !uri.trim().is_empty()),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "threads".to_string()),
            identity_token_secret: env::var("IDENTITY_TOKEN_SECRET")
                .unwrap_or_else(|_| "change-me-identity-provider-secret".to_string()),
        }
    }
}
