//! Tool API handlers.
//!
//! The conversational layer posts a [`ToolCall`] and relays the returned text
//! verbatim. A storage fault is the only case that does not produce text; it
//! becomes a `500` with a fixed, generic message.

use axum::{extract::State, http::StatusCode, Extension, Json};
use helpdesk_core::{Caller, ToolCall, ToolSpec, TOOL_SPECS};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::metrics::TOOL_INVOCATIONS_TOTAL;
use crate::state::AppState;

/// Message returned to the agent when the store faults.
pub const FAULT_MESSAGE: &str =
    "Something went wrong while talking to the ticket database. Please try again.";

/// Response for a tool invocation
#[derive(Debug, Serialize)]
pub struct ToolResponse {
    pub tool: &'static str,
    pub result: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ToolErrorResponse {
    pub tool: &'static str,
    pub error: String,
}

/// List the available tools
pub async fn list_tools() -> Json<&'static [ToolSpec]> {
    Json(TOOL_SPECS)
}

/// Invoke a tool
pub async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(call): Json<ToolCall>,
) -> Result<Json<ToolResponse>, (StatusCode, Json<ToolErrorResponse>)> {
    let tool = call.name();
    info!(tool, caller = %caller.name, "Tool invoked");

    // Store operations block on SQLite.
    let tools = state.tools().clone();
    let outcome = tokio::task::spawn_blocking(move || tools.dispatch(&call)).await;

    match outcome {
        Ok(Ok(result)) => {
            TOOL_INVOCATIONS_TOTAL.with_label_values(&[tool, "ok"]).inc();
            Ok(Json(ToolResponse { tool, result }))
        }
        Ok(Err(e)) => {
            error!(tool, error = %e, "Tool failed");
            Err(fault(tool))
        }
        Err(e) => {
            error!(tool, error = %e, "Tool task panicked");
            Err(fault(tool))
        }
    }
}

fn fault(tool: &'static str) -> (StatusCode, Json<ToolErrorResponse>) {
    TOOL_INVOCATIONS_TOTAL
        .with_label_values(&[tool, "fault"])
        .inc();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ToolErrorResponse {
            tool,
            error: FAULT_MESSAGE.to_string(),
        }),
    )
}
