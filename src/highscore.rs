//! High score persistence
//!
//! A single integer in LocalStorage: read once at startup, written only
//! when a round ends above the stored value. A corrupt or missing value
//! falls back to zero rather than failing startup.

/// LocalStorage key (used only in wasm32)
#[allow(dead_code)]
const STORAGE_KEY: &str = "snack_drop_high_score";

/// Decode a stored value, defaulting to zero on anything unexpected
#[cfg(any(target_arch = "wasm32", test))]
fn parse_stored(raw: &str) -> u32 {
    serde_json::from_str::<u32>(raw).unwrap_or(0)
}

/// Load the persisted high score (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load() -> u32 {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(Some(raw)) = storage.get_item(STORAGE_KEY) {
            let score = parse_stored(&raw);
            log::info!("Loaded high score: {}", score);
            return score;
        }
    }

    log::info!("No stored high score, starting fresh");
    0
}

/// Persist a newly beaten high score (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn save(score: u32) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(json) = serde_json::to_string(&score) {
            let _ = storage.set_item(STORAGE_KEY, &json);
            log::info!("High score saved: {}", score);
        }
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> u32 {
    0
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save(_score: u32) {
    // No-op for native
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_value() {
        assert_eq!(parse_stored("42"), 42);
        assert_eq!(parse_stored("0"), 0);
    }

    #[test]
    fn test_parse_garbage_defaults_to_zero() {
        assert_eq!(parse_stored(""), 0);
        assert_eq!(parse_stored("not a number"), 0);
        assert_eq!(parse_stored("-3"), 0);
        assert_eq!(parse_stored("1.5"), 0);
        assert_eq!(parse_stored("{\"score\":3}"), 0);
    }
}
