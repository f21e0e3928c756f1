//! The six tool operations and their parameter validation.
//!
//! Every tool returns a JSON envelope with at least `success: bool`.
//! Parameter validation happens here; the aggregator assumes its inputs
//! are already well-typed and range-checked.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use dealscout_core::{check_limit, Deal, DealFilter, SearchParams, DEFAULT_LIMIT};

use super::AppState;

/// A tool-level failure, surfaced as an explicit error envelope, never a
/// fault crossing the transport.
pub(super) enum ToolFailure {
    UnknownTool(String),
    InvalidArgs(String),
}

impl ToolFailure {
    fn status(&self) -> StatusCode {
        match self {
            ToolFailure::UnknownTool(_) => StatusCode::NOT_FOUND,
            ToolFailure::InvalidArgs(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            ToolFailure::UnknownTool(name) => format!("unknown tool: {name}"),
            ToolFailure::InvalidArgs(message) => message.clone(),
        }
    }
}

pub(super) async fn call_tool(
    State(state): State<AppState>,
    Path(tool): Path<String>,
    Json(args): Json<Value>,
) -> Response {
    match dispatch(&state, &tool, args).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(failure) => {
            tracing::debug!(tool, error = %failure.message(), "tool call rejected");
            (
                failure.status(),
                Json(json!({ "success": false, "error": failure.message() })),
            )
                .into_response()
        }
    }
}

async fn dispatch(state: &AppState, tool: &str, args: Value) -> Result<Value, ToolFailure> {
    match tool {
        "search_deals" => search_deals(state, args).await,
        "get_top_deals" => get_top_deals(state, args).await,
        "filter_deals" => filter_deals(state, args),
        "get_deal_details" => get_deal_details(state, args).await,
        "compare_deals" => compare_deals(state, args),
        "get_available_sources" => Ok(get_available_sources(state)),
        other => Err(ToolFailure::UnknownTool(other.to_owned())),
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolFailure> {
    serde_json::from_value(args)
        .map_err(|e| ToolFailure::InvalidArgs(format!("invalid {tool} arguments: {e}")))
}

async fn search_deals(state: &AppState, args: Value) -> Result<Value, ToolFailure> {
    let params: SearchParams = parse_args("search_deals", args)?;
    params
        .validate()
        .map_err(|e| ToolFailure::InvalidArgs(e.to_string()))?;

    let deals = state.aggregator.search_deals(&params).await;
    Ok(json!({
        "success": true,
        "results": deals.len(),
        "deals": deals,
    }))
}

#[derive(Debug, Deserialize)]
struct TopDealsArgs {
    #[serde(default = "default_top_limit")]
    limit: usize,
    #[serde(default)]
    sources: Option<Vec<String>>,
}

fn default_top_limit() -> usize {
    DEFAULT_LIMIT
}

async fn get_top_deals(state: &AppState, args: Value) -> Result<Value, ToolFailure> {
    let args: TopDealsArgs = parse_args("get_top_deals", args)?;
    check_limit(args.limit).map_err(|e| ToolFailure::InvalidArgs(e.to_string()))?;

    let deals = state
        .aggregator
        .get_top_deals(args.limit, args.sources.as_deref())
        .await;
    Ok(json!({
        "success": true,
        "results": deals.len(),
        "deals": deals,
    }))
}

#[derive(Debug, Deserialize)]
struct FilterArgs {
    deals: Vec<Deal>,
    #[serde(flatten)]
    filter: DealFilter,
}

fn filter_deals(state: &AppState, args: Value) -> Result<Value, ToolFailure> {
    let args: FilterArgs = parse_args("filter_deals", args)?;
    let original_count = args.deals.len();
    let filtered = state.aggregator.filter_deals(args.deals, &args.filter);
    Ok(json!({
        "success": true,
        "original_count": original_count,
        "filtered_count": filtered.len(),
        "deals": filtered,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsArgs {
    deal_id: String,
    #[serde(default)]
    source: Option<String>,
}

async fn get_deal_details(state: &AppState, args: Value) -> Result<Value, ToolFailure> {
    let args: DetailsArgs = parse_args("get_deal_details", args)?;
    if args.deal_id.trim().is_empty() {
        return Err(ToolFailure::InvalidArgs("dealId must be non-empty".to_owned()));
    }

    let deal = state
        .aggregator
        .get_deal_details(&args.deal_id, args.source.as_deref())
        .await;
    Ok(json!({
        "success": deal.is_some(),
        "deal": deal,
    }))
}

#[derive(Debug, Deserialize)]
struct CompareArgs {
    deals: Vec<Deal>,
}

fn compare_deals(state: &AppState, args: Value) -> Result<Value, ToolFailure> {
    let args: CompareArgs = parse_args("compare_deals", args)?;
    let best = state.aggregator.compare_deals(&args.deals);
    Ok(json!({
        "success": true,
        "original_count": args.deals.len(),
        "best_deals_count": best.len(),
        "best_deals": best,
    }))
}

fn get_available_sources(state: &AppState) -> Value {
    json!({
        "success": true,
        "sources": state.aggregator.get_providers(),
    })
}
