//! Domain records served by the gateway.
//!
//! The gateway exposes a closed set of Pokemon entity kinds. Payloads are
//! opaque structured JSON whose schema is fixed per kind by the upstream;
//! the gateway normalizes and caches them without interpreting most fields.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fixed set of entity kinds the gateway serves.
///
/// Serialized names match the upstream resource segments (`pokemon-species`,
/// `growth-rate`, ...), which double as cache-key namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Pokemon,
    PokemonSpecies,
    EvolutionChain,
    PokemonForm,
    PokemonHabitat,
    PokemonColor,
    PokemonShape,
    Type,
    Ability,
    Characteristic,
    Stat,
    Gender,
    GrowthRate,
    Nature,
    EggGroup,
    Encounters,
}

impl EntityKind {
    /// Namespace segment used in cache keys and log fields.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::Pokemon => "pokemon",
            Self::PokemonSpecies => "pokemon-species",
            Self::EvolutionChain => "evolution-chain",
            Self::PokemonForm => "pokemon-form",
            Self::PokemonHabitat => "pokemon-habitat",
            Self::PokemonColor => "pokemon-color",
            Self::PokemonShape => "pokemon-shape",
            Self::Type => "type",
            Self::Ability => "ability",
            Self::Characteristic => "characteristic",
            Self::Stat => "stat",
            Self::Gender => "gender",
            Self::GrowthRate => "growth-rate",
            Self::Nature => "nature",
            Self::EggGroup => "egg-group",
            Self::Encounters => "encounters",
        }
    }

    /// Upstream request path for a single record of this kind.
    ///
    /// Encounter lists are the one nested resource: they hang off the
    /// pokemon they belong to rather than having a collection of their own.
    pub fn record_path(self, identifier: &Identifier) -> String {
        match self {
            Self::Encounters => format!("pokemon/{identifier}/encounters"),
            _ => format!("{}/{identifier}", self.namespace()),
        }
    }

    /// Upstream request path for a page listing of this kind.
    pub fn page_path(self) -> &'static str {
        match self {
            // Listing encounters without a pokemon is meaningless; the
            // dispatcher never routes a page query here.
            Self::Encounters => "pokemon",
            _ => self.namespace(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

/// Canonical identifier for an upstream record: numeric id or name.
///
/// The upstream treats ids and names as aliases but does not document the
/// mapping, so the two forms are deliberately kept as distinct cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Id(u64),
    Name(String),
}

impl Identifier {
    /// Build a name identifier in canonical form (trimmed, lowercase).
    ///
    /// Upstream resource names are lowercase; normalizing here keeps
    /// `"Pikachu"` and `"pikachu"` on the same cache key.
    pub fn name(raw: &str) -> Self {
        Self::Name(raw.trim().to_ascii_lowercase())
    }

    /// Canonical string form, used verbatim in cache keys and URLs.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl FromStr for Identifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::name(s))
    }
}

/// One fetched entity, as cached and as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Entity kind; fixes the payload schema.
    pub kind: EntityKind,
    /// Canonical identifier the record was fetched under.
    pub identifier: String,
    /// Normalized structured payload.
    pub payload: Value,
    /// When the payload was fetched from upstream.
    pub fetched_at: DateTime<Utc>,
}

impl DomainRecord {
    pub fn new(kind: EntityKind, identifier: &Identifier, payload: Value) -> Self {
        Self {
            kind,
            identifier: identifier.canonical(),
            payload,
            fetched_at: Utc::now(),
        }
    }
}

/// A named reference to an upstream resource, as returned by list queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub name: String,
    pub url: String,
}

/// One page of a list query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// Summaries in upstream order.
    pub items: Vec<ResourceSummary>,
    /// Offset of the next page; `None` iff this is the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<u32>,
    /// Total number of records the upstream reports for this kind.
    pub total_count: u32,
}

/// One side of a battle comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub types: Vec<String>,
    pub stat_total: u64,
}

/// Battle comparison between two pokemon, with a rendered verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub first: Combatant,
    pub second: Combatant,
    pub summary: String,
}

/// Result of a dispatched query: a single record, a page, or a comparison.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Record(DomainRecord),
    Page(PageResult),
    Comparison(ComparisonReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_serializes_as_namespace() {
        let kind: EntityKind = serde_json::from_value(json!("growth-rate")).unwrap();
        assert_eq!(kind, EntityKind::GrowthRate);
        assert_eq!(
            serde_json::to_value(EntityKind::PokemonSpecies).unwrap(),
            json!("pokemon-species")
        );
    }

    #[test]
    fn test_record_path() {
        let pikachu = Identifier::name("Pikachu");
        assert_eq!(
            EntityKind::Pokemon.record_path(&pikachu),
            "pokemon/pikachu"
        );
        assert_eq!(
            EntityKind::Encounters.record_path(&Identifier::Id(25)),
            "pokemon/25/encounters"
        );
        assert_eq!(
            EntityKind::GrowthRate.record_path(&Identifier::name("medium")),
            "growth-rate/medium"
        );
    }

    #[test]
    fn test_identifier_canonical_form() {
        assert_eq!(Identifier::name("  Pikachu ").canonical(), "pikachu");
        assert_eq!(Identifier::Id(25).canonical(), "25");
    }

    #[test]
    fn test_identifier_untagged_deserialization() {
        let id: Identifier = serde_json::from_value(json!(25)).unwrap();
        assert_eq!(id, Identifier::Id(25));
        let name: Identifier = serde_json::from_value(json!("pikachu")).unwrap();
        assert_eq!(name, Identifier::Name("pikachu".into()));
    }

    #[test]
    fn test_domain_record_round_trips_through_json() {
        let record = DomainRecord::new(
            EntityKind::Pokemon,
            &Identifier::Id(25),
            json!({"id": 25, "name": "pikachu"}),
        );
        let raw = serde_json::to_string(&record).unwrap();
        let back: DomainRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.kind, EntityKind::Pokemon);
        assert_eq!(back.identifier, "25");
        assert_eq!(back.payload["name"], "pikachu");
    }
}
