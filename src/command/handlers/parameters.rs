//! Parameter-set switching handler

use tracing::info;

use super::{Fields, HandlerContext};
use crate::error::CommandError;
use scopelink_shared::{set_parameters, SetParameters};

/// Handle SET_PARAMETERS
///
/// Existence is checked the same way in both modes; test mode stops short of
/// activation.
pub async fn handle_set_parameters(
    ctx: &HandlerContext,
    cmd: &SetParameters,
) -> Result<Fields, CommandError> {
    let target = cmd
        .target
        .as_ref()
        .ok_or_else(|| CommandError::InvalidRequest("missing parameter target".into()))?;

    if ctx.test_mode {
        let params = ctx.params.read().await;
        match target {
            set_parameters::Target::Name(name) => {
                params
                    .by_name(name)
                    .ok_or_else(|| CommandError::ParametersNotFound(name.clone()))?;
            }
            set_parameters::Target::Index(index) => {
                params
                    .get(*index)
                    .ok_or_else(|| CommandError::ParametersNotFound(index.to_string()))?;
            }
        }
        return Ok(Vec::new());
    }

    let mut params = ctx.params.write().await;
    match target {
        set_parameters::Target::Name(name) => params.set_active_by_name(name)?,
        set_parameters::Target::Index(index) => params.set_active_by_index(*index)?,
    }
    info!("Active parameters: {}", params.active().name);

    Ok(Vec::new())
}
