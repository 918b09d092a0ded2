//! Stage motion and position handlers

use tracing::info;

use super::{Fields, HandlerContext};
use crate::error::CommandError;
use scopelink_shared::{MoveStage, Value};

/// Synthetic duration reported for test-mode moves, seconds
const TEST_MODE_MOVE_DURATION: i64 = 1;

/// Handle GET_STAGE_POSITION
///
/// After a move, the commanded position becomes readable once the stage has
/// settled; callers needing a confirmed position wait before re-querying.
pub async fn handle_get_stage_position(ctx: &HandlerContext) -> Result<Fields, CommandError> {
    let state = ctx.state.read().await;
    let (x, y) = state.stage().position().await;
    Ok(vec![
        ("stage_x".to_string(), Value::real(x)),
        ("stage_y".to_string(), Value::real(y)),
    ])
}

/// Handle MOVE_STAGE
pub async fn handle_move_stage(
    ctx: &HandlerContext,
    cmd: &MoveStage,
) -> Result<Fields, CommandError> {
    if !cmd.x.is_finite() || !cmd.y.is_finite() {
        return Err(CommandError::InvalidRequest("non-finite stage target".into()));
    }

    if ctx.test_mode {
        return Ok(vec![(
            "duration".to_string(),
            Value::integer(TEST_MODE_MOVE_DURATION),
        )]);
    }

    let mut state = ctx.state.write().await;
    let duration = state.stage_mut().move_to(cmd.x, cmd.y).await?;
    info!(
        "Stage moving to ({:.1}, {:.1}), {:.3}s travel",
        cmd.x, cmd.y, duration
    );

    Ok(vec![("duration".to_string(), Value::real(duration))])
}
