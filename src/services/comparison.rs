//! Battle comparison over cached pokemon records.
//!
//! Fetches both combatants through the repository, so a comparison warms
//! the same cache entries as plain pokemon lookups. The verdict is a
//! base-stat-total heuristic; type matchups are listed but not scored.

use serde_json::Value;

use crate::domain::errors::GatewayResult;
use crate::domain::models::{Combatant, ComparisonReport, EntityKind, Identifier};
use crate::services::repository::EntityRepository;

/// Compare two pokemon and render a verdict.
pub async fn compare_pokemon(
    repository: &EntityRepository,
    first: &Identifier,
    second: &Identifier,
) -> GatewayResult<ComparisonReport> {
    let a = repository.get_record(EntityKind::Pokemon, first).await?;
    let b = repository.get_record(EntityKind::Pokemon, second).await?;

    let first = combatant(&a.identifier, &a.payload);
    let second = combatant(&b.identifier, &b.payload);
    let summary = render_summary(&first, &second);

    Ok(ComparisonReport {
        first,
        second,
        summary,
    })
}

fn combatant(identifier: &str, payload: &Value) -> Combatant {
    let name = payload
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(identifier)
        .to_string();

    Combatant {
        name,
        types: type_names(payload),
        stat_total: stat_total(payload),
    }
}

/// Sum of `base_stat` over the record's stats array.
fn stat_total(payload: &Value) -> u64 {
    payload
        .get("stats")
        .and_then(Value::as_array)
        .map(|stats| {
            stats
                .iter()
                .filter_map(|s| s.get("base_stat").and_then(Value::as_u64))
                .sum()
        })
        .unwrap_or(0)
}

/// Type names in slot order, e.g. `["grass", "poison"]`.
fn type_names(payload: &Value) -> Vec<String> {
    payload
        .get("types")
        .and_then(Value::as_array)
        .map(|types| {
            types
                .iter()
                .filter_map(|t| t.pointer("/type/name").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn render_summary(first: &Combatant, second: &Combatant) -> String {
    let a = title_case(&first.name);
    let b = title_case(&second.name);

    let mut lines = vec![
        format!("Comparing {a} vs {b}:"),
        String::new(),
        format!("{a}:"),
        format!("- Types: {}", first.types.join(", ")),
        format!("- Total base stats: {}", first.stat_total),
        String::new(),
        format!("{b}:"),
        format!("- Types: {}", second.types.join(", ")),
        format!("- Total base stats: {}", second.stat_total),
        String::new(),
    ];

    let verdict = match first.stat_total.cmp(&second.stat_total) {
        std::cmp::Ordering::Greater => format!(
            "{a} would likely win with {} total base stats vs {}!",
            first.stat_total, second.stat_total
        ),
        std::cmp::Ordering::Less => format!(
            "{b} would likely win with {} total base stats vs {}!",
            second.stat_total, first.stat_total
        ),
        std::cmp::Ordering::Equal => format!(
            "It's a tie! Both Pokemon have {} total base stats.",
            first.stat_total
        ),
    };
    lines.push(verdict);

    lines.join("\n")
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
