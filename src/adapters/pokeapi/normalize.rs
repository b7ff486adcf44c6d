//! Per-kind payload normalization.
//!
//! Each entity kind has a fixed payload schema. The upstream occasionally
//! omits fields it documents as required for pokemon records; fill them
//! with neutral defaults so cached payloads always carry the full shape.

use serde_json::{json, Value};

use crate::domain::models::EntityKind;

/// Normalize a freshly fetched payload in place.
pub fn normalize_payload(kind: EntityKind, payload: &mut Value) {
    if kind == EntityKind::Pokemon {
        fill_pokemon_defaults(payload);
    }
}

fn fill_pokemon_defaults(payload: &mut Value) {
    let Some(map) = payload.as_object_mut() else {
        return;
    };

    let defaults = [
        ("base_experience", json!(0)),
        ("is_default", json!(true)),
        ("order", json!(0)),
        ("sprites", json!({})),
        ("stats", json!([])),
        ("types", json!([])),
        ("abilities", json!([])),
        ("game_indices", json!([])),
    ];

    for (field, default) in defaults {
        map.entry(field).or_insert(default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pokemon_defaults_filled() {
        let mut payload = json!({"id": 25, "name": "pikachu"});
        normalize_payload(EntityKind::Pokemon, &mut payload);

        assert_eq!(payload["base_experience"], 0);
        assert_eq!(payload["is_default"], true);
        assert_eq!(payload["sprites"], json!({}));
        assert_eq!(payload["stats"], json!([]));
    }

    #[test]
    fn test_present_fields_untouched() {
        let mut payload = json!({"id": 25, "base_experience": 112, "order": 35});
        normalize_payload(EntityKind::Pokemon, &mut payload);

        assert_eq!(payload["base_experience"], 112);
        assert_eq!(payload["order"], 35);
    }

    #[test]
    fn test_other_kinds_pass_through() {
        let original = json!({"id": 1, "name": "monster"});
        let mut payload = original.clone();
        normalize_payload(EntityKind::EggGroup, &mut payload);
        assert_eq!(payload, original);

        // Encounter payloads are arrays; must not be touched.
        let mut encounters = json!([{"location_area": {"name": "viridian-forest"}}]);
        let expected = encounters.clone();
        normalize_payload(EntityKind::Encounters, &mut encounters);
        assert_eq!(encounters, expected);
    }
}
