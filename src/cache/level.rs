//! Declared cache levels and the scope each one maps to.

use std::fmt;

use crate::cache::store::Scope;

/// How long a computed property value may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheLevel {
    /// Never cached; every read recomputes.
    None,
    /// Cached alongside the materialized element.
    #[default]
    Element,
    /// Cached for all elements produced by the same snapshot.
    Elements,
    /// Cached for the whole read transaction.
    Snapshot,
}

/// Level → store. `Element` and `Elements` share the element-scoped store.
const DISPATCH: [(CacheLevel, Option<Scope>); 4] = [
    (CacheLevel::None, None),
    (CacheLevel::Element, Some(Scope::Element)),
    (CacheLevel::Elements, Some(Scope::Element)),
    (CacheLevel::Snapshot, Some(Scope::Snapshot)),
];

impl CacheLevel {
    /// The store backing this level, or `None` when values are never cached.
    pub fn scope(self) -> Option<Scope> {
        DISPATCH
            .iter()
            .find(|(level, _)| *level == self)
            .and_then(|(_, scope)| *scope)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLevel::None => "none",
            CacheLevel::Element => "element",
            CacheLevel::Elements => "elements",
            CacheLevel::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_table() {
        assert_eq!(CacheLevel::None.scope(), None);
        assert_eq!(CacheLevel::Element.scope(), Some(Scope::Element));
        assert_eq!(CacheLevel::Elements.scope(), Some(Scope::Element));
        assert_eq!(CacheLevel::Snapshot.scope(), Some(Scope::Snapshot));
    }
}
