//! Name → adapter lookup.

use crate::adapter::{AdapterSettings, ExchangeAdapter, RestExchange};
use crate::error::{ExchangeError, ExchangeResult};
use crate::profile::ExchangeProfile;
use crate::transport::Transport;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registered adapters, keyed by lowercase name.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ExchangeAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a [`RestExchange`] for every profile, all sharing `transport`.
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = ExchangeProfile>,
        transport: Arc<dyn Transport>,
        settings: &AdapterSettings,
    ) -> ExchangeResult<Self> {
        let mut registry = Self::new();
        for profile in profiles {
            profile.validate()?;
            registry.register(Arc::new(RestExchange::new(profile, transport.clone(), settings)));
        }
        Ok(registry)
    }

    /// Add an adapter, replacing any adapter registered under the same name.
    pub fn register(&mut self, adapter: Arc<dyn ExchangeAdapter>) {
        let name = adapter.name().to_ascii_lowercase();
        debug!("Registering exchange adapter {}", name);
        self.adapters.insert(name, adapter);
    }

    pub fn get(&self, name: &str) -> ExchangeResult<Arc<dyn ExchangeAdapter>> {
        self.adapters
            .get(&name.trim().to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| ExchangeError::UnknownExchange(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adapters.contains_key(&name.trim().to_ascii_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.adapters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn ExchangeAdapter>> {
        self.adapters.values()
    }

    /// Keep only the named adapters. Unknown names are an error.
    pub fn retain_named(&mut self, names: &[String]) -> ExchangeResult<()> {
        let wanted: Vec<String> = names.iter().map(|n| n.trim().to_ascii_lowercase()).collect();
        if let Some(missing) = wanted.iter().find(|n| !self.adapters.contains_key(n.as_str())) {
            return Err(ExchangeError::UnknownExchange(missing.clone()));
        }
        self.adapters.retain(|name, _| wanted.contains(name));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.names())
            .finish()
    }
}
