use crate::place::PlaceDraft;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const DEFAULT_VISIT_TIME: &str = "10:00";

/// Bounding box for the fake coordinates handed out by [`MockLinkParser`].
pub const MOCK_LAT_RANGE: std::ops::Range<f64> = 33.3..33.5;
pub const MOCK_LNG_RANGE: std::ops::Range<f64> = 126.5..126.7;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkParseError {
    #[error("link must not be empty")]
    EmptyLink,
}

/// Turns a shared map link into a place draft the user can review.
pub trait LinkParser {
    fn parse(&mut self, link: &str) -> Result<PlaceDraft, LinkParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub category: &'static str,
    pub cost: f64,
}

pub const MOCK_CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        name: "Seongsan Ilchulbong",
        category: "Sightseeing",
        cost: 5000.0,
    },
    CatalogEntry {
        name: "Delicious Black Pork",
        category: "Restaurant",
        cost: 50000.0,
    },
    CatalogEntry {
        name: "Sunset Cafe",
        category: "Cafe",
        cost: 12000.0,
    },
    CatalogEntry {
        name: "Hamdeok Beach",
        category: "Beach",
        cost: 0.0,
    },
];

/// Stand-in parser: ignores the link's content and returns a random catalog
/// entry at a random spot near Jeju.
#[derive(Debug, Clone)]
pub struct MockLinkParser {
    rng: StdRng,
}

impl MockLinkParser {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for MockLinkParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkParser for MockLinkParser {
    fn parse(&mut self, link: &str) -> Result<PlaceDraft, LinkParseError> {
        let link = link.trim();
        if link.is_empty() {
            return Err(LinkParseError::EmptyLink);
        }

        let entry = MOCK_CATALOG
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(MOCK_CATALOG[0]);
        let lat = self.rng.gen_range(MOCK_LAT_RANGE);
        let lng = self.rng.gen_range(MOCK_LNG_RANGE);
        tracing::debug!(link, name = entry.name, "mock-parsed link");

        Ok(PlaceDraft::new(entry.name, entry.category, 0)
            .with_time(DEFAULT_VISIT_TIME)
            .with_cost(entry.cost)
            .with_link(link)
            .with_coordinates(lat, lng))
    }
}
