use std::collections::HashMap;

use tracing::debug;

use crate::models::{RegimeError, TaxRegime};

/// Registry of [`TaxRegime`]s, keyed by regime id.
///
/// Typical lifetime:
/// 1. Create with [`RegimeRegistry::with_builtin`] (or `new` for an empty one).
/// 2. Call `register` for any regime loaded from disk.
/// 3. Call `get` (or `default_regime`) whenever a computation needs one.
///
/// Adding a tax year is a `register` call; the engine itself never changes.
#[derive(Debug, Clone)]
pub struct RegimeRegistry {
    regimes: HashMap<String, TaxRegime>,
    default_id: Option<String>,
}

impl RegimeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            regimes: HashMap::new(),
            default_id: None,
        }
    }

    /// A registry holding the built-in regimes, with `ng-2025` as default.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let regime = TaxRegime::nigeria_2025();
        registry.default_id = Some(regime.id.clone());
        registry.regimes.insert(regime.id.clone(), regime);
        registry
    }

    /// Validate and register a regime.
    ///
    /// A regime with the same id is replaced. The first regime registered
    /// into an empty registry becomes the default.
    ///
    /// # Errors
    /// Any [`RegimeError`] returned by [`TaxRegime::validate`].
    pub fn register(
        &mut self,
        regime: TaxRegime,
    ) -> Result<(), RegimeError> {
        regime.validate()?;
        debug!(id = %regime.id, bands = regime.bands.len(), "registered tax regime");
        if self.default_id.is_none() {
            self.default_id = Some(regime.id.clone());
        }
        self.regimes.insert(regime.id.clone(), regime);
        Ok(())
    }

    /// Ids of every registered regime, sorted alphabetically.
    pub fn available(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.regimes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// # Errors
    /// [`RegimeError::UnknownRegime`] if nothing is registered under `id`.
    pub fn get(
        &self,
        id: &str,
    ) -> Result<&TaxRegime, RegimeError> {
        self.regimes.get(id).ok_or_else(|| RegimeError::UnknownRegime {
            requested: id.to_string(),
            available: self.available().into_iter().map(str::to_string).collect(),
        })
    }

    /// Make `id` the default regime.
    ///
    /// # Errors
    /// [`RegimeError::UnknownRegime`] if nothing is registered under `id`.
    pub fn set_default(
        &mut self,
        id: &str,
    ) -> Result<(), RegimeError> {
        self.get(id)?;
        self.default_id = Some(id.to_string());
        Ok(())
    }

    /// # Errors
    /// [`RegimeError::UnknownRegime`] if the registry is empty.
    pub fn default_regime(&self) -> Result<&TaxRegime, RegimeError> {
        match &self.default_id {
            Some(id) => self.get(id),
            None => Err(RegimeError::UnknownRegime {
                requested: "<default>".to_string(),
                available: Vec::new(),
            }),
        }
    }
}

impl Default for RegimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
