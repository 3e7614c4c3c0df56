use std::sync::Arc;
use std::time::Duration;

use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::mongodb::ensure_indexes_exist;
use crate::store::{MongoStore, Stores};
use crate::wizard::SessionRegistry;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_store_timeout")]
    store_timeout: u64,
    #[serde(default = "default_session_ttl")]
    session_ttl: u64,
}

fn default_store_timeout() -> u64 {
    10
}

fn default_session_ttl() -> u64 {
    3600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_timeout: default_store_timeout(),
            session_ttl: default_session_ttl(),
        }
    }
}

impl Config {
    /// How long any single store call may take, in seconds.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout)
    }

    /// How long a wizard session may sit idle before it is discarded, in seconds.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl)
    }
}

/// A fairing that loads the application config and puts it, along with the
/// session registry it configures, in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!(
            "Sessions expire after {}s idle, store calls time out after {}s",
            config.session_ttl, config.store_timeout
        );

        // Manage the state.
        let registry = SessionRegistry::new(config.session_ttl());
        rocket = rocket.manage(config).manage(registry);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
}

fn default_db_name() -> String {
    "election".to_string()
}

/// A fairing that loads the MongoDB config, connects to the database,
/// makes sure the indexes exist, and places the [`Stores`] built on it into
/// managed state.
///
/// Must be attached after [`ConfigFairing`] for the configured store timeout
/// to apply.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");
        // Construct the connection.
        let client = match MongoClient::with_uri_str(config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&config.db_name);

        // Ensure the required indexes exist.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to connect to database: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        // Manage the state.
        let timeout = match rocket.state::<Config>() {
            Some(config) => config.store_timeout(),
            None => Config::default().store_timeout(),
        };
        let store = Arc::new(MongoStore::from_db(&db));
        rocket = rocket.manage(Stores::new(store.clone(), store, timeout));
        Ok(rocket)
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::Figment;

    use super::*;

    #[test]
    fn defaults_apply() {
        let config = Figment::new().extract::<Config>().unwrap();
        assert_eq!(config.store_timeout(), Duration::from_secs(10));
        assert_eq!(config.session_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn overrides_apply() {
        let config = Figment::new()
            .merge(("store_timeout", 2))
            .merge(("session_ttl", 60))
            .extract::<Config>()
            .unwrap();
        assert_eq!(config.store_timeout(), Duration::from_secs(2));
        assert_eq!(config.session_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn database_name_defaults() {
        let config = Figment::new()
            .merge(("db_uri", "mongodb://localhost:27017"))
            .extract::<DbConfig>()
            .unwrap();
        assert_eq!(config.db_name, "election");
        assert!(Figment::new().extract::<DbConfig>().is_err());
    }
}
