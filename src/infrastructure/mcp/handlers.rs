//! MCP tool handlers over the query dispatcher.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::services::{Operation, QueryDispatcher};

use super::types::{error_codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Application state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<QueryDispatcher>,
}

/// Entry point for JSON-RPC requests.
pub async fn handle_gateway_request(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> JsonRpcResponse {
    debug!(method = %request.method, "received request");
    let id = request.id.clone();

    match request.method.as_str() {
        "initialize" => handle_initialize(id),
        "tools/list" => handle_list_tools(id),
        "tools/call" => handle_tool_call(&state, request).await,
        other => JsonRpcResponse::failure(
            id,
            JsonRpcError::new(
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        ),
    }
}

fn handle_initialize(id: Option<Value>) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "pokegate",
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

fn handle_list_tools(id: Option<Value>) -> JsonRpcResponse {
    let tools: Vec<Value> = Operation::ALL.into_iter().map(tool_descriptor).collect();
    JsonRpcResponse::success(id, json!({ "tools": tools }))
}

async fn handle_tool_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id.clone();

    let Some(params) = request.params else {
        return JsonRpcResponse::failure(
            id,
            JsonRpcError::new(error_codes::INVALID_PARAMS, "Missing params"),
        );
    };

    let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::failure(
            id,
            JsonRpcError::new(error_codes::INVALID_PARAMS, "Missing tool name"),
        );
    };

    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    match state.dispatcher.dispatch(tool_name, arguments).await {
        Ok(outcome) => {
            info!(tool = %tool_name, "tool call succeeded");
            let text = serde_json::to_string_pretty(&outcome)
                .unwrap_or_else(|_| "Error serializing result".to_string());
            JsonRpcResponse::success(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": text
                        }
                    ]
                }),
            )
        }
        Err(err) => {
            info!(tool = %tool_name, error = %err, "tool call failed");
            JsonRpcResponse::failure(id, JsonRpcError::from(&err))
        }
    }
}

/// Health report handler, polled by external orchestration.
pub async fn handle_health(State(state): State<AppState>) -> Json<Value> {
    let repository = state.dispatcher.repository();
    let cache = if repository.cache_reachable().await {
        "ok"
    } else {
        "unreachable"
    };
    let upstream = if repository.upstream_reachable().await {
        "ok"
    } else {
        "unreachable"
    };

    let status = if cache == "ok" && upstream == "ok" {
        "ok"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "cache": cache,
        "upstream": upstream,
    }))
}

/// MCP descriptor for one operation.
fn tool_descriptor(op: Operation) -> Value {
    let input_schema = match op {
        Operation::ListPokemon => json!({
            "type": "object",
            "properties": {
                "offset": { "type": "integer", "default": 0, "minimum": 0 },
                "limit": { "type": "integer", "default": 20, "minimum": 1, "maximum": 100 }
            }
        }),
        Operation::ComparePokemon => json!({
            "type": "object",
            "properties": {
                "pokemon1": {
                    "type": ["string", "integer"],
                    "description": "Name or numeric id of the first Pokemon"
                },
                "pokemon2": {
                    "type": ["string", "integer"],
                    "description": "Name or numeric id of the second Pokemon"
                }
            },
            "required": ["pokemon1", "pokemon2"]
        }),
        _ => json!({
            "type": "object",
            "properties": {
                "identifier": {
                    "type": ["string", "integer"],
                    "description": "Resource name or numeric id"
                }
            },
            "required": ["identifier"]
        }),
    };

    json!({
        "name": op.name(),
        "description": tool_description(op),
        "inputSchema": input_schema
    })
}

fn tool_description(op: Operation) -> &'static str {
    match op {
        Operation::GetPokemon => "Get a Pokemon by name or id",
        Operation::ListPokemon => "List Pokemon with pagination",
        Operation::GetPokemonSpecies => "Get a Pokemon species by name or id",
        Operation::GetEvolutionChain => "Get an evolution chain by id",
        Operation::GetPokemonForm => "Get a Pokemon form by name or id",
        Operation::GetPokemonHabitat => "Get a Pokemon habitat by name or id",
        Operation::GetPokemonColor => "Get a Pokemon color by name or id",
        Operation::GetPokemonShape => "Get a Pokemon shape by name or id",
        Operation::GetType => "Get a Pokemon type by name or id",
        Operation::GetAbility => "Get an ability by name or id",
        Operation::GetCharacteristic => "Get a characteristic by id",
        Operation::GetStat => "Get a stat by name or id",
        Operation::GetGender => "Get a gender by name or id",
        Operation::GetGrowthRate => "Get a growth rate by name or id",
        Operation::GetNature => "Get a nature by name or id",
        Operation::GetEggGroup => "Get an egg group by name or id",
        Operation::GetPokemonEncounters => "Get encounter locations for a Pokemon by name or id",
        Operation::ComparePokemon => {
            "Compare two Pokemon and estimate which would win in a battle"
        }
    }
}
