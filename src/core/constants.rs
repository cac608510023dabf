//! Constants used throughout kvault.
//!
//! Centralizes magic strings and configuration values.

/// Profile store directory relative to HOME (~/.vault).
pub const STORE_DIR: &str = ".vault";

/// Profile store file name inside [`STORE_DIR`].
pub const CREDENTIALS_FILE: &str = "credentials";

/// Unix mode for the profile store directory.
pub const STORE_DIR_MODE: u32 = 0o700;

/// Unix mode for the profile store file and pulled env files.
pub const SECRET_FILE_MODE: u32 = 0o600;

/// Environment variable supplying the endpoint url.
pub const ENDPOINT_ENV: &str = "VAULT_ENDPOINT_URL";

/// Environment variable supplying the token.
pub const TOKEN_ENV: &str = "VAULT_TOKEN";

/// Environment variable controlling log filters.
pub const LOG_ENV: &str = "KVAULT_LOG";

/// Engine type used by `mount`.
pub const KV_ENGINE: &str = "kv-v2";

/// Header carrying the client token.
pub const TOKEN_HEADER: &str = "X-Vault-Token";
