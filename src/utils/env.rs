// src/utils/env.rs
use log::debug;

/// Loads `.env` from the working directory if present. Missing file is not an error.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found, using process environment"),
    }
}
