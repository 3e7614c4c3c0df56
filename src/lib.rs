#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod wizard;

pub use config::Config;

/// The server as deployed: configuration and the MongoDB-backed stores are
/// loaded by fairings at ignition.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(logging::LoggerFairing)
        .attach(config::ConfigFairing)
        .attach(config::DatabaseFairing)
}

/// The server with default configuration, backed by an in-memory store.
#[cfg(test)]
pub(crate) fn rocket_for_store(store: store::memory::MemoryStore) -> Rocket<Build> {
    use std::sync::Arc;

    let config = Config::default();
    let stores = store::Stores::new(
        Arc::new(store.clone()),
        Arc::new(store),
        config.store_timeout(),
    );
    rocket::build()
        .mount("/", api::routes())
        .attach(logging::LoggerFairing)
        .manage(wizard::SessionRegistry::new(config.session_ttl()))
        .manage(stores)
        .manage(config)
}
