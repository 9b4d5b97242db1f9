use chrono::Duration;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{common::address::Address, ledger::Ledger};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    // secrets
    jwt_secret: String,
    hmac_secret: String,
}

impl Config {
    /// Valid lifetime of auth token cookies in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to sign and check JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Secret key used to digest national identifiers.
    pub fn hmac_secret(&self) -> &[u8] {
        self.hmac_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
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

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Deployment-time configuration of the ledger.
#[derive(Deserialize)]
struct LedgerConfig {
    administrator: Address,
    candidates: Vec<String>,
}

/// A fairing that loads the ledger config, builds the identity registry and
/// ballot, and places the resulting [`Ledger`] into managed state.
///
/// Must be attached after [`ConfigFairing`].
pub struct LedgerFairing;

#[rocket::async_trait]
impl Fairing for LedgerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Ledger",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<LedgerConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load ledger config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        let anchor_key = match rocket.state::<Config>() {
            Some(app_config) => app_config.hmac_secret().to_vec(),
            None => {
                error!("Application config must be loaded before the ledger");
                return Err(rocket);
            }
        };

        // Build the ledger.
        let ledger = match Ledger::new(config.administrator, anchor_key, config.candidates) {
            Ok(ledger) => ledger,
            Err(e) => {
                error!("Failed to build ledger: {e}");
                return Err(rocket);
            }
        };
        info!(
            "Ledger online: administrator {}, {} candidates",
            config.administrator,
            ledger.ballot().candidate_list().len()
        );

        // Manage the state.
        rocket = rocket.manage(ledger);
        Ok(rocket)
    }
}

/// Example data for tests.
#[cfg(test)]
pub mod examples {
    use super::*;

    impl Config {
        pub fn example() -> Self {
            Self::example_with_jwt_secret("test-jwt-secret")
        }

        pub fn example_with_jwt_secret(jwt_secret: &str) -> Self {
            Self {
                auth_ttl: 3600,
                jwt_secret: jwt_secret.to_string(),
                hmac_secret: "test-hmac-secret".to_string(),
            }
        }
    }
}
