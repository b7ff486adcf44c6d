//! Cache key derivation.
//!
//! Keys are deterministic and namespaced by entity kind so distinct logical
//! parameters never collide: `pokegate:pokemon:25`,
//! `pokegate:pokemon:page:20:20`. Pagination parameters appear verbatim.
//! Identifiers reach this module already canonicalized (trimmed, lowercase,
//! restricted alphabet), so keys stay readable instead of hashed.

use crate::domain::models::{EntityKind, Identifier};

/// Reserved segment separating record keys from page keys within a kind.
const PAGE_SEGMENT: &str = "page";

/// Key for a single record of `kind`.
pub fn record_key(prefix: &str, kind: EntityKind, identifier: &Identifier) -> String {
    format!("{prefix}:{}:{}", kind.namespace(), identifier.canonical())
}

/// Key for one page of a list query over `kind`.
pub fn page_key(prefix: &str, kind: EntityKind, offset: u32, limit: u32) -> String {
    format!("{prefix}:{}:{PAGE_SEGMENT}:{offset}:{limit}", kind.namespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const PREFIX: &str = "pokegate";

    #[test]
    fn test_record_key_shape() {
        assert_eq!(
            record_key(PREFIX, EntityKind::Pokemon, &Identifier::Id(25)),
            "pokegate:pokemon:25"
        );
        assert_eq!(
            record_key(PREFIX, EntityKind::EggGroup, &Identifier::name("Monster")),
            "pokegate:egg-group:monster"
        );
    }

    #[test]
    fn test_page_key_shape() {
        assert_eq!(
            page_key(PREFIX, EntityKind::Pokemon, 20, 20),
            "pokegate:pokemon:page:20:20"
        );
    }

    #[test]
    fn test_deterministic() {
        let a = record_key(PREFIX, EntityKind::Stat, &Identifier::name("speed"));
        let b = record_key(PREFIX, EntityKind::Stat, &Identifier::name("speed"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_kinds_never_collide() {
        let kinds = [
            EntityKind::Pokemon,
            EntityKind::PokemonSpecies,
            EntityKind::EvolutionChain,
            EntityKind::PokemonForm,
            EntityKind::PokemonHabitat,
            EntityKind::PokemonColor,
            EntityKind::PokemonShape,
            EntityKind::Type,
            EntityKind::Ability,
            EntityKind::Characteristic,
            EntityKind::Stat,
            EntityKind::Gender,
            EntityKind::GrowthRate,
            EntityKind::Nature,
            EntityKind::EggGroup,
            EntityKind::Encounters,
        ];
        let keys: HashSet<_> = kinds
            .iter()
            .map(|k| record_key(PREFIX, *k, &Identifier::Id(1)))
            .collect();
        assert_eq!(keys.len(), kinds.len());
    }

    #[test]
    fn test_alias_forms_are_distinct_keys() {
        // Upstream aliases id 25 and "pikachu", but the key builder must
        // not assume that mapping.
        let by_id = record_key(PREFIX, EntityKind::Pokemon, &Identifier::Id(25));
        let by_name = record_key(PREFIX, EntityKind::Pokemon, &Identifier::name("pikachu"));
        assert_ne!(by_id, by_name);
    }

    proptest! {
        /// Distinct (identifier, pagination) tuples map to distinct keys.
        #[test]
        fn prop_page_keys_injective(
            a in (0u32..10_000, 1u32..100),
            b in (0u32..10_000, 1u32..100),
        ) {
            let ka = page_key(PREFIX, EntityKind::Pokemon, a.0, a.1);
            let kb = page_key(PREFIX, EntityKind::Pokemon, b.0, b.1);
            prop_assert_eq!(a == b, ka == kb);
        }

        #[test]
        fn prop_record_keys_injective(a in "[a-z0-9-]{1,24}", b in "[a-z0-9-]{1,24}") {
            let ka = record_key(PREFIX, EntityKind::Nature, &Identifier::name(&a));
            let kb = record_key(PREFIX, EntityKind::Nature, &Identifier::name(&b));
            prop_assert_eq!(a == b, ka == kb);
        }
    }
}
