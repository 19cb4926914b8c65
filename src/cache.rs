use std::collections::BTreeMap;

use crate::any::{RcAny, TypeInfo};

/// Singleton store, keyed by the narrowed node key.
pub(crate) struct Cache {
    map: BTreeMap<TypeInfo, RcAny>,
}

impl Cache {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[must_use]
    pub(crate) fn get(&self, info: &TypeInfo) -> Option<RcAny> {
        self.map.get(info).cloned()
    }

    /// Inserts the freshly built value unless another build won the race,
    /// and returns whichever value is canonical. Builds may race on first
    /// concurrent access; the cached instance never does.
    #[must_use]
    pub(crate) fn insert_canonical(&mut self, info: TypeInfo, value: RcAny) -> RcAny {
        self.map.entry(info).or_insert(value).clone()
    }

    /// Evicts a key so the next resolution rebuilds through the current
    /// provider. Called on provider overwrite.
    pub(crate) fn remove(&mut self, info: &TypeInfo) {
        self.map.remove(info);
    }
}
