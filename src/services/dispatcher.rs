//! Query dispatcher: operation name + arguments → repository call.
//!
//! The operation set is a closed enum mapped through one exhaustive `match`,
//! fixed at compile time. Argument validation happens entirely here; a
//! request that reaches the repository is well-formed.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::{EntityKind, Identifier, QueryOutcome};
use crate::services::comparison;
use crate::services::repository::EntityRepository;

/// Upstream's default page size for list queries.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page a caller may request in one query.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// The published tool set, one operation per tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetPokemon,
    ListPokemon,
    GetPokemonSpecies,
    GetEvolutionChain,
    GetPokemonForm,
    GetPokemonHabitat,
    GetPokemonColor,
    GetPokemonShape,
    GetType,
    GetAbility,
    GetCharacteristic,
    GetStat,
    GetGender,
    GetGrowthRate,
    GetNature,
    GetEggGroup,
    GetPokemonEncounters,
    ComparePokemon,
}

impl Operation {
    /// Every supported operation, in published order.
    pub const ALL: [Self; 18] = [
        Self::GetPokemon,
        Self::ListPokemon,
        Self::GetPokemonSpecies,
        Self::GetEvolutionChain,
        Self::GetPokemonForm,
        Self::GetPokemonHabitat,
        Self::GetPokemonColor,
        Self::GetPokemonShape,
        Self::GetType,
        Self::GetAbility,
        Self::GetCharacteristic,
        Self::GetStat,
        Self::GetGender,
        Self::GetGrowthRate,
        Self::GetNature,
        Self::GetEggGroup,
        Self::GetPokemonEncounters,
        Self::ComparePokemon,
    ];

    /// Wire name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetPokemon => "get_pokemon",
            Self::ListPokemon => "list_pokemon",
            Self::GetPokemonSpecies => "get_pokemon_species",
            Self::GetEvolutionChain => "get_evolution_chain",
            Self::GetPokemonForm => "get_pokemon_form",
            Self::GetPokemonHabitat => "get_pokemon_habitat",
            Self::GetPokemonColor => "get_pokemon_color",
            Self::GetPokemonShape => "get_pokemon_shape",
            Self::GetType => "get_type",
            Self::GetAbility => "get_ability",
            Self::GetCharacteristic => "get_characteristic",
            Self::GetStat => "get_stat",
            Self::GetGender => "get_gender",
            Self::GetGrowthRate => "get_growth_rate",
            Self::GetNature => "get_nature",
            Self::GetEggGroup => "get_egg_group",
            Self::GetPokemonEncounters => "get_pokemon_encounters",
            Self::ComparePokemon => "compare_pokemon",
        }
    }

    /// Resolve a wire name. `None` for unknown operations.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Entity kind this operation queries.
    pub fn kind(self) -> EntityKind {
        match self {
            Self::GetPokemon | Self::ListPokemon | Self::ComparePokemon => EntityKind::Pokemon,
            Self::GetPokemonSpecies => EntityKind::PokemonSpecies,
            Self::GetEvolutionChain => EntityKind::EvolutionChain,
            Self::GetPokemonForm => EntityKind::PokemonForm,
            Self::GetPokemonHabitat => EntityKind::PokemonHabitat,
            Self::GetPokemonColor => EntityKind::PokemonColor,
            Self::GetPokemonShape => EntityKind::PokemonShape,
            Self::GetType => EntityKind::Type,
            Self::GetAbility => EntityKind::Ability,
            Self::GetCharacteristic => EntityKind::Characteristic,
            Self::GetStat => EntityKind::Stat,
            Self::GetGender => EntityKind::Gender,
            Self::GetGrowthRate => EntityKind::GrowthRate,
            Self::GetNature => EntityKind::Nature,
            Self::GetEggGroup => EntityKind::EggGroup,
            Self::GetPokemonEncounters => EntityKind::Encounters,
        }
    }

    /// Whether this operation returns a page rather than a single record.
    pub fn is_list(self) -> bool {
        matches!(self, Self::ListPokemon)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments for record operations.
#[derive(Debug, Deserialize)]
struct RecordArgs {
    identifier: Identifier,
}

/// Arguments for the battle comparison, wire names matching the tool schema.
#[derive(Debug, Deserialize)]
struct CompareArgs {
    pokemon1: Identifier,
    pokemon2: Identifier,
}

/// Arguments for list operations.
#[derive(Debug, Deserialize)]
struct ListArgs {
    #[serde(default)]
    offset: u32,
    #[serde(default = "default_limit")]
    limit: u32,
}

const fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

/// Routes validated queries to the repository.
pub struct QueryDispatcher {
    repository: Arc<EntityRepository>,
}

impl QueryDispatcher {
    pub fn new(repository: Arc<EntityRepository>) -> Self {
        Self { repository }
    }

    /// Dispatch one query.
    ///
    /// Unknown operations and malformed arguments resolve to
    /// `InvalidArguments` without touching cache or upstream.
    pub async fn dispatch(&self, operation: &str, arguments: Value) -> GatewayResult<QueryOutcome> {
        let op = Operation::from_name(operation)
            .ok_or_else(|| GatewayError::InvalidArguments(format!("unknown operation: {operation}")))?;

        match op {
            Operation::ListPokemon => {
                let args = parse_list_args(arguments)?;
                let page = self
                    .repository
                    .get_page(op.kind(), args.offset, args.limit)
                    .await?;
                Ok(QueryOutcome::Page(page))
            }
            Operation::ComparePokemon => {
                let (first, second) = parse_compare_args(arguments)?;
                let report =
                    comparison::compare_pokemon(&self.repository, &first, &second).await?;
                Ok(QueryOutcome::Comparison(report))
            }
            _ => {
                let identifier = parse_record_args(arguments)?;
                let record = self.repository.get_record(op.kind(), &identifier).await?;
                Ok(QueryOutcome::Record(record))
            }
        }
    }

    /// Health probe passthrough for the protocol layer.
    pub fn repository(&self) -> &EntityRepository {
        &self.repository
    }
}

fn parse_record_args(arguments: Value) -> GatewayResult<Identifier> {
    let args: RecordArgs = serde_json::from_value(arguments)
        .map_err(|err| GatewayError::InvalidArguments(format!("invalid parameters: {err}")))?;
    validate_identifier(args.identifier)
}

fn parse_compare_args(arguments: Value) -> GatewayResult<(Identifier, Identifier)> {
    let args: CompareArgs = serde_json::from_value(arguments)
        .map_err(|err| GatewayError::InvalidArguments(format!("invalid parameters: {err}")))?;
    Ok((
        validate_identifier(args.pokemon1)?,
        validate_identifier(args.pokemon2)?,
    ))
}

fn parse_list_args(arguments: Value) -> GatewayResult<ListArgs> {
    let args: ListArgs = serde_json::from_value(arguments)
        .map_err(|err| GatewayError::InvalidArguments(format!("invalid parameters: {err}")))?;

    if args.limit == 0 || args.limit > MAX_PAGE_LIMIT {
        return Err(GatewayError::InvalidArguments(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}, got {}",
            args.limit
        )));
    }
    Ok(args)
}

/// Canonicalize and validate an identifier.
///
/// Names are trimmed and lowercased, then restricted to the upstream's
/// resource-name alphabet so they embed safely in cache keys and URLs.
fn validate_identifier(identifier: Identifier) -> GatewayResult<Identifier> {
    match identifier {
        Identifier::Id(id) => Ok(Identifier::Id(id)),
        Identifier::Name(raw) => {
            let canonical = Identifier::name(&raw);
            let Identifier::Name(name) = &canonical else {
                unreachable!("Identifier::name always yields a Name");
            };
            if name.is_empty() {
                return Err(GatewayError::InvalidArguments(
                    "identifier must not be empty".to_string(),
                ));
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(GatewayError::InvalidArguments(format!(
                    "identifier contains unsupported characters: {raw}"
                )));
            }
            Ok(canonical)
        }
    }
}
