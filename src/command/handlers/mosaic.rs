//! Mosaic and objective query handlers
//!
//! Read-only; real and test mode are identical.

use super::{Fields, HandlerContext};
use crate::error::CommandError;
use scopelink_shared::Value;

/// Handle GET_MOSAIC_SETTINGS: one descriptor field per configured objective
pub async fn handle_get_mosaic_settings(ctx: &HandlerContext) -> Result<Fields, CommandError> {
    let state = ctx.state.read().await;
    Ok(state
        .objectives()
        .iter()
        .map(|objective| (objective.id.clone(), Value::text(objective.mosaic_descriptor())))
        .collect())
}

/// Handle GET_OBJECTIVE
pub async fn handle_get_objective(ctx: &HandlerContext) -> Result<Fields, CommandError> {
    let state = ctx.state.read().await;
    Ok(vec![(
        "objective".to_string(),
        Value::text(state.objective().name.as_str()),
    )])
}
