//! Armor filters
//!
//! Callers narrow the inventory with any number of filters. The search sees
//! them as one composed predicate: a piece is eligible only if every filter
//! allows it.

use ahash::AHashSet;
use std::sync::Arc;

use crate::equipment::ArmorPiece;

/// A predicate over armor pieces
pub trait ArmorFilter: Send + Sync {
    fn allows(&self, piece: &ArmorPiece) -> bool;
}

impl<F> ArmorFilter for F
where
    F: Fn(&ArmorPiece) -> bool + Send + Sync,
{
    fn allows(&self, piece: &ArmorPiece) -> bool {
        self(piece)
    }
}

/// Logical AND of every filter added
#[derive(Clone, Default)]
pub struct FilterSet {
    filters: Vec<Arc<dyn ArmorFilter>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl ArmorFilter + 'static) -> Self {
        self.push(filter);
        self
    }

    pub fn push(&mut self, filter: impl ArmorFilter + 'static) {
        self.filters.push(Arc::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True when every filter allows the piece (vacuously true when empty)
    pub fn allows(&self, piece: &ArmorPiece) -> bool {
        self.filters.iter().all(|f| f.allows(piece))
    }
}

impl std::fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSet")
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Keep pieces whose rarity lies in `min..=max`
#[derive(Debug, Clone, Copy)]
pub struct RarityFilter {
    pub min: u8,
    pub max: u8,
}

impl ArmorFilter for RarityFilter {
    fn allows(&self, piece: &ArmorPiece) -> bool {
        piece.rarity >= self.min && piece.rarity <= self.max
    }
}

/// Reject pieces by name (e.g. gear the hunter has not forged)
#[derive(Debug, Clone, Default)]
pub struct ExcludedPiecesFilter {
    names: AHashSet<String>,
}

impl ExcludedPiecesFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ArmorFilter for ExcludedPiecesFilter {
    fn allows(&self, piece: &ArmorPiece) -> bool {
        !self.names.contains(&piece.name)
    }
}

/// Keep pieces with at least `min` base defense
#[derive(Debug, Clone, Copy)]
pub struct MinDefenseFilter {
    pub min: u32,
}

impl ArmorFilter for MinDefenseFilter {
    fn allows(&self, piece: &ArmorPiece) -> bool {
        piece.defense >= self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ArmorSlot;

    fn piece(name: &str, rarity: u8) -> ArmorPiece {
        ArmorPiece::new(name, ArmorSlot::Head).with_rarity(rarity)
    }

    #[test]
    fn test_empty_set_allows_everything() {
        let filters = FilterSet::new();
        assert!(filters.is_empty());
        assert!(filters.allows(&piece("Leather Cap", 1)));
    }

    #[test]
    fn test_composed_filters_are_anded() {
        let filters = FilterSet::new()
            .with(RarityFilter { min: 2, max: 5 })
            .with(ExcludedPiecesFilter::new(["Rath Helm"]));
        assert_eq!(filters.len(), 2);
        assert!(filters.allows(&piece("Kut-Ku Helm", 3)));
        assert!(!filters.allows(&piece("Rath Helm", 3)));
        assert!(!filters.allows(&piece("Leather Cap", 1)));
    }

    #[test]
    fn test_closure_filter() {
        let filters = FilterSet::new().with(|p: &ArmorPiece| p.name.starts_with('K'));
        assert!(filters.allows(&piece("Kirin Horn", 6)));
        assert!(!filters.allows(&piece("Bone Helm", 1)));
    }

    #[test]
    fn test_min_defense() {
        let mut strong = piece("Plate Helm", 4);
        strong.defense = 40;
        let filter = MinDefenseFilter { min: 30 };
        assert!(filter.allows(&strong));
        assert!(!filter.allows(&piece("Cloth Hat", 1)));
    }
}
