//! kvault - a command-line client for Vault key/value secrets.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── shell         # Command descriptors, validation, session gating
//! │   ├── profile       # make-profile, profiles, delete-profile
//! │   ├── mount         # mount / unmount kv-v2 engines
//! │   ├── push, pull    # .env <-> secret path
//! │   ├── pipe          # Run a command with secrets in its environment
//! │   ├── remove        # rm
//! │   ├── seal          # seal / unseal
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── path          # <mount>/<sub-path> secret references
//!     ├── profile       # ~/.vault/credentials profile store
//!     ├── credentials   # Profile vs. explicit endpoint/token resolution
//!     ├── backend/      # Backend trait
//!     │   └── http      # Vault HTTP API implementation
//!     ├── session       # Authenticated handle gated on seal state
//!     ├── unseal        # Threshold unseal state machine
//!     └── env           # dotenv / JSON / shell formats
//! ```

pub mod cli;
pub mod core;
pub mod error;
