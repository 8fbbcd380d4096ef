// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;

// Token configuration constants
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const BEARER_TOKEN_TYPE: &str = "bearer";

// Credential store lookups are bounded so a slow backend cannot hang a login
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

// Minimum wall-clock duration of a login attempt, successful or not
pub const DEFAULT_LOGIN_FLOOR_MS: u64 = 100;
