//! Core library components.
//!
//! Credential resolution, the secret path model, the backend client and
//! the seal/unseal logic. Nothing in here prints to the terminal.

pub mod backend;
pub mod constants;
pub mod credentials;
pub mod env;
pub mod path;
pub mod profile;
pub mod session;
pub mod unseal;
