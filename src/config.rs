/// Application-level constants
pub const APP_NAME: &str = "Binsight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard cap on uploaded image size. Larger submissions are rejected before decode.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Quality used when re-encoding the canonical JPEG form.
pub const JPEG_QUALITY: u8 = 90;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini REST API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Preferred vision models in order of preference.
pub const GEMINI_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-pro-vision",
];

/// Default request timeout for model calls, in seconds.
pub const GEMINI_TIMEOUT_SECS: u64 = 120;

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_cap_is_five_mib() {
        assert_eq!(MAX_UPLOAD_BYTES, 5 * 1024 * 1024);
    }

    #[test]
    fn model_preference_order_newest_first() {
        assert_eq!(GEMINI_MODELS[0], "gemini-2.5-flash");
        assert_eq!(GEMINI_MODELS.last(), Some(&"gemini-pro-vision"));
    }

    #[test]
    fn default_filter_scoped_to_crate() {
        assert_eq!(default_log_filter(), "binsight=info");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
