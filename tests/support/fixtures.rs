//! Test fixtures and constants.

/// Token used for explicit-credential commands.
pub const ROOT_TOKEN: &str = "root-token";

/// Endpoint that nothing listens on; commands that reach the network fail.
pub const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

/// Sample .env file content for push tests.
pub const SAMPLE_ENV: &str = "foo=bar\nbaz=qux\n";

/// Sample .env with edge cases.
pub const SAMPLE_ENV_COMPLEX: &str = r#"
# This is a comment
SIMPLE=value
QUOTED="quoted value"
SINGLE_QUOTED='single quoted'
export EXPORTED=yes

# Another comment
SPECIAL_CHARS=p@ssw0rd!$%
"#;

/// Sample JSON environment.
pub const SAMPLE_JSON: &str = r#"{"foo": "bar", "port": 8080}"#;
