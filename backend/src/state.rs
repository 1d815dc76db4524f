use crate::api_client::YahooClient;
use crate::config::AppConfig;
use crate::i18n::LanguageTable;
use crate::lookup::SymbolLookup;
use crate::services::price_service::FetchPolicy;
use std::sync::Arc;

/// Shared, read-only request context
/// Nothing here is mutated after startup
pub struct AppState<P = YahooClient> {
    pub provider: Arc<P>,
    pub lookup: Arc<SymbolLookup>,
    pub texts: Arc<LanguageTable>,
    pub fetch_policy: FetchPolicy,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            lookup: Arc::clone(&self.lookup),
            texts: Arc::clone(&self.texts),
            fetch_policy: self.fetch_policy,
        }
    }
}

impl AppState<YahooClient> {
    pub fn from_config(config: &AppConfig, lookup: SymbolLookup) -> Self {
        Self::new(
            YahooClient::new(config.price_api_base_url.clone()),
            lookup,
            LanguageTable::builtin(config.default_language),
            config.fetch,
        )
    }
}

impl<P> AppState<P> {
    pub fn new(provider: P, lookup: SymbolLookup, texts: LanguageTable, fetch_policy: FetchPolicy) -> Self {
        Self {
            provider: Arc::new(provider),
            lookup: Arc::new(lookup),
            texts: Arc::new(texts),
            fetch_policy,
        }
    }
}
