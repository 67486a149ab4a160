//! Best survival time
//!
//! A single scalar (whole seconds survived) persisted through a `ScoreStore`.
//! On the web this is LocalStorage; elsewhere it lives in memory.

/// Storage for the one persisted value
pub trait ScoreStore {
    /// Stored best time in seconds, if any
    fn get(&self) -> Option<u64>;
    fn set(&mut self, seconds: u64);
}

/// In-memory store (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(seconds: u64) -> Self {
        Self {
            value: Some(seconds),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self) -> Option<u64> {
        self.value
    }

    fn set(&mut self, seconds: u64) {
        self.value = Some(seconds);
    }
}

/// Parse a stored value, flooring fractional seconds
///
/// Anything that is not a finite, non-negative number reads as absent.
pub fn parse_stored(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.floor() as u64)
}

/// The best time seen so far, backed by a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    pub best_seconds: u64,
}

impl HighScore {
    /// Load the stored best (0 when nothing is stored)
    pub fn load<S: ScoreStore>(store: &S) -> Self {
        let best_seconds = store.get().unwrap_or(0);
        log::info!("High score loaded: {}s", best_seconds);
        Self { best_seconds }
    }

    /// Record a finished run; persists and returns true only if it is a new best
    pub fn submit<S: ScoreStore>(&mut self, seconds: u64, store: &mut S) -> bool {
        if seconds <= self.best_seconds {
            return false;
        }
        self.best_seconds = seconds;
        store.set(seconds);
        log::info!("New high score: {}s", seconds);
        true
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "wave_survivor_high_score";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn get(&self) -> Option<u64> {
        let raw = Self::storage()?.get_item(Self::STORAGE_KEY).ok()??;
        let parsed = parse_stored(&raw);
        if parsed.is_none() {
            log::warn!("Ignoring unreadable stored high score: {:?}", raw);
        }
        parsed
    }

    fn set(&mut self, seconds: u64) {
        match Self::storage() {
            Some(storage) => {
                if storage
                    .set_item(Self::STORAGE_KEY, &seconds.to_string())
                    .is_err()
                {
                    log::warn!("Failed to persist high score");
                }
            }
            None => log::warn!("LocalStorage unavailable, high score not saved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best_seconds, 0);
    }

    #[test]
    fn test_better_run_is_persisted() {
        let mut store = MemoryStore::with_value(30);
        let mut high = HighScore::load(&store);
        assert_eq!(high.best_seconds, 30);

        assert!(high.submit(45, &mut store));
        assert_eq!(high.best_seconds, 45);
        assert_eq!(store.get(), Some(45));
    }

    #[test]
    fn test_equal_or_worse_run_is_ignored() {
        let mut store = MemoryStore::with_value(30);
        let mut high = HighScore::load(&store);
        assert!(!high.submit(30, &mut store));
        assert!(!high.submit(12, &mut store));
        assert_eq!(store.get(), Some(30));
    }

    #[test]
    fn test_parse_stored() {
        assert_eq!(parse_stored("45"), Some(45));
        assert_eq!(parse_stored(" 12.9 "), Some(12));
        assert_eq!(parse_stored("-3"), None);
        assert_eq!(parse_stored("NaN"), None);
        assert_eq!(parse_stored("abc"), None);
    }
}
