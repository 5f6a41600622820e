//! Two-tier token logo and market-metadata cache.
//!
//! Front tier is an in-process map with insertion-order eviction (cap 50);
//! back tier is a persistent key-value store with timestamp-order eviction
//! (cap 20) that survives restarts. Entries expire after one hour. All three
//! collaborators (clock, market-data provider, persistent store) are
//! injected so tests can drive time and failures deterministically.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::MarketData;
use crate::utils::now_unix_ms;

/// Entry lifetime: one hour.
pub const CACHE_TTL_MS: u64 = 60 * 60 * 1000;
/// Memory-tier capacity, oldest-inserted evicted first.
pub const MEMORY_CAP: usize = 50;
/// Persistent-tier capacity, oldest-by-timestamp evicted first.
pub const PERSISTENT_CAP: usize = 20;

const KEY_PREFIX: &str = "coingecko_logo_";

/// Known symbol to CoinGecko coin-id mappings. Anything else falls back to
/// the lowercased symbol, which CoinGecko accepts for most listed coins.
const SYMBOL_TO_ID: &[(&str, &str)] = &[
    ("SUI", "sui"),
    ("USDC", "usd-coin"),
    ("USDT", "tether"),
    ("ETH", "ethereum"),
    ("BTC", "bitcoin"),
];

/// Static fallback logos served without any network round-trip.
const STATIC_LOGOS: &[(&str, &str)] = &[
    ("SUI", "https://strapi-dev.scand.app/uploads/sui_c07df05f00.png"),
    (
        "USDC",
        "https://assets.coingecko.com/coins/images/6319/large/USD_Coin_icon.png",
    ),
    (
        "USDT",
        "https://assets.coingecko.com/coins/images/325/large/Tether.png",
    ),
    (
        "ETH",
        "https://assets.coingecko.com/coins/images/279/large/ethereum.png",
    ),
    (
        "BTC",
        "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
    ),
];

const COMMON_COINS: &[&str] = &["SUI", "USDC", "USDT", "ETH", "BTC"];

/// CoinGecko coin id for a symbol.
pub fn coin_id(symbol: &str) -> String {
    let upper = symbol.to_uppercase();
    SYMBOL_TO_ID
        .iter()
        .find(|(sym, _)| *sym == upper)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| symbol.to_lowercase())
}

/// Static logo URL for well-known symbols, no fetch involved.
pub fn static_logo(symbol: &str) -> Option<&'static str> {
    let upper = symbol.to_uppercase();
    STATIC_LOGOS
        .iter()
        .find(|(sym, _)| *sym == upper)
        .map(|(_, url)| *url)
}

/// Emoji stand-in when no logo image is available.
pub fn token_icon(coin_name: Option<&str>) -> &'static str {
    let Some(name) = coin_name else { return "💰" };
    match name {
        "SUI" => "🟢",
        "USDC" | "USDT" => "💵",
        "ETH" => "💎",
        "BTC" => "₿",
        _ => "🪙",
    }
}

// =============================================================================
// Collaborator traits
// =============================================================================

/// Time source, injected so TTL behavior is testable.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        now_unix_ms()
    }
}

/// External market-data source. `Ok(None)` means "no usable data" (unknown
/// symbol, empty result, missing image); `Err` means a transport failure.
/// Both are treated as cache misses that are never written back.
pub trait MarketDataProvider {
    fn fetch_market_data(&self, symbol: &str) -> Result<Option<MarketData>>;
}

/// Persistent string-keyed storage. `set` may fail on quota; the cache
/// degrades to memory-only for that entry after one evict-and-retry.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str);
    fn keys(&self) -> Vec<String>;
}

// =============================================================================
// Cache
// =============================================================================

/// One cached logo record, serialized as JSON in the persistent tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedLogo {
    pub logo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_data: Option<MarketData>,
    pub timestamp: u64,
}

pub struct LogoCache<P, S, C> {
    provider: P,
    store: S,
    clock: C,
    // Insertion-ordered; updates keep an entry's original position.
    memory: Vec<(String, CachedLogo)>,
}

impl<P: MarketDataProvider, S: KvStore, C: Clock> LogoCache<P, S, C> {
    /// Build a cache, warming the memory tier from persistent entries that
    /// are still within TTL. Expired or unreadable persistent entries are
    /// purged as encountered.
    pub fn new(provider: P, store: S, clock: C) -> Self {
        let mut cache = LogoCache {
            provider,
            store,
            clock,
            memory: Vec::new(),
        };
        cache.load_persistent();
        cache
    }

    fn load_persistent(&mut self) {
        let now = self.clock.now_ms();
        for key in self.store.keys() {
            let Some(id) = key.strip_prefix(KEY_PREFIX).map(String::from) else {
                continue;
            };
            let Some(raw) = self.store.get(&key) else { continue };
            match serde_json::from_str::<CachedLogo>(&raw) {
                Ok(entry) if now.saturating_sub(entry.timestamp) <= CACHE_TTL_MS => {
                    self.memory_insert(id, entry);
                }
                _ => {
                    debug!(key, "dropping expired or unreadable cache entry");
                    self.store.remove(&key);
                }
            }
        }
    }

    /// Logo URL for a symbol, from cache or a fresh fetch. `None` means the
    /// provider had nothing usable; nothing is cached in that case.
    pub fn get_logo(&mut self, symbol: &str) -> Option<String> {
        if let Some(entry) = self.cached(symbol) {
            return Some(entry.logo_url);
        }
        self.fetch_and_cache(symbol).map(|e| e.logo_url)
    }

    /// Full market metadata for a symbol, same caching contract as
    /// `get_logo`.
    pub fn get_price_data(&mut self, symbol: &str) -> Option<MarketData> {
        if let Some(entry) = self.cached(symbol) {
            if entry.price_data.is_some() {
                return entry.price_data;
            }
        }
        self.fetch_and_cache(symbol).and_then(|e| e.price_data)
    }

    /// Warm the cache for the common symbols. Failures are logged and
    /// skipped; prefetch never propagates errors.
    pub fn prefetch_common_logos(&mut self) {
        for symbol in COMMON_COINS {
            if self.get_logo(symbol).is_none() {
                debug!(symbol, "prefetch produced no logo");
            }
        }
    }

    /// Current number of memory-tier entries.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    fn cached(&mut self, symbol: &str) -> Option<CachedLogo> {
        let id = coin_id(symbol);
        let pos = self.memory.iter().position(|(k, _)| *k == id)?;
        let now = self.clock.now_ms();
        if now.saturating_sub(self.memory[pos].1.timestamp) > CACHE_TTL_MS {
            self.memory.remove(pos);
            return None;
        }
        Some(self.memory[pos].1.clone())
    }

    fn fetch_and_cache(&mut self, symbol: &str) -> Option<CachedLogo> {
        let market = match self.provider.fetch_market_data(symbol) {
            Ok(Some(m)) if !m.image.is_empty() => m,
            Ok(_) => {
                debug!(symbol, "no usable market data");
                return None;
            }
            Err(err) => {
                warn!(symbol, error = %err, "market data fetch failed");
                return None;
            }
        };

        let entry = CachedLogo {
            logo_url: market.image.clone(),
            price_data: Some(market),
            timestamp: self.clock.now_ms(),
        };
        let id = coin_id(symbol);
        self.memory_insert(id.clone(), entry.clone());
        self.persist(&id, &entry);
        Some(entry)
    }

    fn memory_insert(&mut self, id: String, entry: CachedLogo) {
        if let Some(existing) = self.memory.iter_mut().find(|(k, _)| *k == id) {
            existing.1 = entry;
            return;
        }
        if self.memory.len() >= MEMORY_CAP {
            self.memory.remove(0);
        }
        self.memory.push((id, entry));
    }

    fn persist(&mut self, id: &str, entry: &CachedLogo) {
        let key = format!("{}{}", KEY_PREFIX, id);
        let Ok(payload) = serde_json::to_string(entry) else { return };

        self.evict_persistent_to(PERSISTENT_CAP.saturating_sub(1), Some(&key));
        if self.store.set(&key, &payload).is_ok() {
            return;
        }
        // Quota: evict the oldest entry and retry once, then give up.
        self.evict_oldest_persistent(Some(&key));
        if self.store.set(&key, &payload).is_err() {
            warn!(key, "persistent cache write failed twice, keeping entry memory-only");
        }
    }

    /// Shrink the persistent tier to at most `cap` entries, never counting
    /// or evicting `keep`.
    fn evict_persistent_to(&mut self, cap: usize, keep: Option<&str>) {
        loop {
            let count = self
                .store
                .keys()
                .iter()
                .filter(|k| k.starts_with(KEY_PREFIX) && Some(k.as_str()) != keep)
                .count();
            if count <= cap {
                return;
            }
            if !self.evict_oldest_persistent(keep) {
                return;
            }
        }
    }

    fn evict_oldest_persistent(&mut self, keep: Option<&str>) -> bool {
        let mut oldest: Option<(String, u64)> = None;
        for key in self.store.keys() {
            if !key.starts_with(KEY_PREFIX) || Some(key.as_str()) == keep {
                continue;
            }
            let timestamp = self
                .store
                .get(&key)
                .and_then(|raw| serde_json::from_str::<CachedLogo>(&raw).ok())
                .map(|e| e.timestamp)
                // Unreadable entries sort first so they get evicted eagerly
                .unwrap_or(0);
            if oldest.as_ref().map(|(_, t)| timestamp < *t).unwrap_or(true) {
                oldest = Some((key, timestamp));
            }
        }
        match oldest {
            Some((key, _)) => {
                debug!(key, "evicting oldest persistent cache entry");
                self.store.remove(&key);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Filesystem-backed store
// =============================================================================

/// `KvStore` over one JSON file per key in a cache directory.
pub struct FsKvStore {
    dir: std::path::PathBuf,
}

impl FsKvStore {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(FsKvStore { dir })
    }

    /// Default store under the platform cache directory, overridable with
    /// `SUI_LENS_CACHE_DIR`.
    pub fn default_location() -> Result<Self> {
        let dir = match crate::utils::env_var::<String>("SUI_LENS_CACHE_DIR") {
            Some(d) => std::path::PathBuf::from(d),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("sui-lens"),
        };
        FsKvStore::new(dir)
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        // Keys are ASCII identifiers; a flat filename per key is enough
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStore for FsKvStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }

    fn keys(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                e.file_name()
                    .to_str()
                    .and_then(|name| name.strip_suffix(".json"))
                    .map(String::from)
            })
            .collect()
    }
}
