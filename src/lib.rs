#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, LedgerFairing};
use crate::logging::LoggerFairing;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// Build the server from `Rocket.toml` and `ROCKET_*` environment variables.
pub fn build() -> Rocket<Build> {
    assemble(rocket::build())
}

/// Mount the routes and attach the fairings. Order matters: the ledger
/// reads the application config during ignition.
fn assemble(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(LedgerFairing)
        .attach(LoggerFairing)
}

/// A server with fixed test configuration and a fresh, empty ledger.
#[cfg(test)]
pub(crate) fn test_rocket() -> Rocket<Build> {
    use crate::model::{ballot::examples::candidates, common::address::Address};

    let figment = rocket::Config::figment()
        .merge(("jwt_secret", "test-jwt-secret"))
        .merge(("hmac_secret", "test-hmac-secret"))
        .merge(("auth_ttl", 3600))
        .merge(("administrator", Address::admin().to_string()))
        .merge(("candidates", candidates()))
        .merge(("log_level", "off"));
    assemble(rocket::custom(figment))
}
