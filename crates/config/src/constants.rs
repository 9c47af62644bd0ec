//! Centralized constants for the conversation engine
//!
//! Single source of truth for defaults shared by the interpreters, the
//! orchestrators and the settings loader.

/// Dialogue limits
pub mod dialogue {
    /// Consecutive invalid answers before a dialogue is abandoned
    pub const MAX_RETRIES: u8 = 3;

    /// Upper bound accepted for `engine.max_retries`
    pub const MAX_RETRIES_CEILING: u8 = 10;

    /// Global cancel keywords, matched as whole words
    pub const CANCEL_KEYWORDS: &[&str] = &["annulla", "cancel"];
}

/// Currency handling
pub mod currency {
    /// Applied when a cost is present and no currency was ever expressed
    pub const DEFAULT: &str = "EUR";

    /// Closed set of ISO codes the currency interpreter emits
    pub const SUPPORTED: &[&str] = &["EUR", "USD", "GBP", "CHF", "JPY", "CAD"];

    pub fn is_supported(code: &str) -> bool {
        SUPPORTED.contains(&code)
    }
}

/// Context store defaults
pub mod store {
    /// Idle contexts older than this are swept (seconds)
    pub const CONTEXT_TTL_SECS: u64 = 3600;

    /// Sweep period (seconds)
    pub const CLEANUP_INTERVAL_SECS: u64 = 300;

    pub const DEFAULT_KEY_PREFIX: &str = "travel_chat:ctx";

    pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
}

/// Interpreter confidence levels
pub mod confidence {
    /// Exact match on a closed set or canonical format
    pub const EXACT: f32 = 1.0;

    /// Fixed confidence of a confirmation match
    pub const CONFIRMATION: f32 = 0.95;

    /// Keyword / synonym match
    pub const KEYWORD: f32 = 0.85;

    /// Datetime with no time fragment
    pub const DATE_ONLY: f32 = 0.7;
}
