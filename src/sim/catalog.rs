//! Entity catalog
//!
//! Static registry of the things that can scroll toward the player. Each entry
//! pairs a display name with an opaque drawable handle; the presentation layer
//! decides what a handle actually draws.

use serde::{Deserialize, Serialize};

use crate::tuning::TuningError;

/// Entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Ends the run on contact
    Obstacle,
    /// Worth one point on contact
    Collectible,
}

/// Opaque reference to an image owned by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawableHandle(pub u32);

/// A spawnable kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub drawable: DrawableHandle,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, drawable: DrawableHandle) -> Self {
        Self {
            name: name.into(),
            drawable,
        }
    }
}

/// Obstacle and collectible kinds, in a fixed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    obstacles: Vec<CatalogEntry>,
    collectibles: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(obstacles: Vec<CatalogEntry>, collectibles: Vec<CatalogEntry>) -> Self {
        Self {
            obstacles,
            collectibles,
        }
    }

    /// Entries of one category
    pub fn entries(&self, kind: EntityKind) -> &[CatalogEntry] {
        match kind {
            EntityKind::Obstacle => &self.obstacles,
            EntityKind::Collectible => &self.collectibles,
        }
    }

    /// Every entry with its category, collectibles first (handle order of the default catalog)
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &CatalogEntry)> {
        self.collectibles
            .iter()
            .map(|e| (EntityKind::Collectible, e))
            .chain(self.obstacles.iter().map(|e| (EntityKind::Obstacle, e)))
    }

    /// Both categories must offer at least one entry
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.obstacles.is_empty() {
            return Err(TuningError::EmptyCategory(EntityKind::Obstacle));
        }
        if self.collectibles.is_empty() {
            return Err(TuningError::EmptyCategory(EntityKind::Collectible));
        }
        Ok(())
    }
}

impl Default for Catalog {
    /// The campus-life set: handles 0..=2 are collectibles, 3..=5 obstacles
    fn default() -> Self {
        Self {
            collectibles: vec![
                CatalogEntry::new("CodeConnect", DrawableHandle(0)),
                CatalogEntry::new("Academic Support", DrawableHandle(1)),
                CatalogEntry::new("Community Meetup", DrawableHandle(2)),
            ],
            obstacles: vec![
                CatalogEntry::new("A Bug!", DrawableHandle(3)),
                CatalogEntry::new("Missed Deadline", DrawableHandle(4)),
                CatalogEntry::new("Exam Stress", DrawableHandle(5)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.entries(EntityKind::Obstacle).len(), 3);
        assert_eq!(catalog.entries(EntityKind::Collectible)[0].name, "CodeConnect");
        assert_eq!(catalog.entries(EntityKind::Obstacle)[0].name, "A Bug!");

        let handles: Vec<u32> = catalog.iter().map(|(_, e)| e.drawable.0).collect();
        assert_eq!(handles, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_category_rejected() {
        let catalog = Catalog::new(Vec::new(), vec![CatalogEntry::new("Coin", DrawableHandle(0))]);
        assert!(matches!(
            catalog.validate(),
            Err(TuningError::EmptyCategory(EntityKind::Obstacle))
        ));
    }
}
