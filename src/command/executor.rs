//! Command executor: validates and dispatches incoming requests

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use scopelink_shared::{
    envelope, request, Envelope, Header, MessageType, Request, Response,
};

use super::handlers::{self, Fields, HandlerContext};
use crate::config::HostConfig;
use crate::error::CommandError;
use crate::instrument::{CameraDriver, InstrumentState, Objective, SimCamera, SimStage};
use crate::parameters::ParameterStore;

/// Executes remote-control requests against the shared instrument state
///
/// One executor exists per host process; sessions share it. Real-mode
/// commands take the instrument write lock, test-mode commands read.
pub struct CommandExecutor {
    state: Arc<RwLock<InstrumentState>>,
    params: Arc<RwLock<ParameterStore>>,
    camera: Arc<dyn CameraDriver>,
    deadline: Duration,
    sequence_id: AtomicU64,
}

impl CommandExecutor {
    /// Build an executor with simulated drivers from the host configuration
    pub fn from_config(config: &HostConfig) -> Result<Self> {
        let stage = SimStage::new(
            config.stage_speed_um_s,
            Duration::from_millis(config.stage_settle_ms),
        );
        let objectives: Vec<Objective> = config.objectives.iter().map(Objective::from).collect();
        let state = InstrumentState::new(objectives, Box::new(stage))?;

        let mut params = ParameterStore::new();
        if let Some(dir) = &config.parameter_dir {
            let loaded = params.load_dir(dir)?;
            info!("Loaded {} parameter sets from {}", loaded, dir.display());
        }

        Ok(Self::new(
            state,
            params,
            Arc::new(SimCamera),
            Duration::from_millis(config.command_deadline_ms),
        ))
    }

    /// Build an executor from explicit parts
    pub fn new(
        state: InstrumentState,
        params: ParameterStore,
        camera: Arc<dyn CameraDriver>,
        deadline: Duration,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            params: Arc::new(RwLock::new(params)),
            camera,
            deadline,
            sequence_id: AtomicU64::new(0),
        }
    }

    /// Shared handle to the parameter store
    pub fn parameters(&self) -> Arc<RwLock<ParameterStore>> {
        self.params.clone()
    }

    /// Execute one request and produce the response envelope
    ///
    /// Every failure, including a deadline overrun, becomes a per-command
    /// error response; nothing here tears down the connection.
    pub async fn execute(&self, request: &Request, header: &Header) -> Envelope {
        let outcome = match timeout(self.deadline, self.dispatch(request)).await {
            Ok(result) => result,
            Err(_) => Err(CommandError::DeadlineExceeded),
        };

        let response = match outcome {
            Ok(fields) => {
                debug!(
                    "Command ok: seq={} fields={}",
                    header.sequence_id,
                    fields.len()
                );
                let mut response = Response::ok(header.sequence_id);
                for (name, value) in fields {
                    response = response.with_field(name, value);
                }
                response
            }
            Err(err) => {
                // The wire carries a bare error flag; the kind is log-only
                warn!("Command failed: seq={} {}", header.sequence_id, err);
                Response::error(header.sequence_id)
            }
        };

        self.wrap(response)
    }

    /// Answer an envelope that does not carry a well-formed request
    pub fn reject(&self, header: &Header) -> Envelope {
        warn!(
            "Rejecting malformed envelope: seq={} from {}",
            header.sequence_id, header.client_id
        );
        self.wrap(Response::error(header.sequence_id))
    }

    async fn dispatch(&self, request: &Request) -> Result<Fields, CommandError> {
        let ctx = HandlerContext {
            state: self.state.clone(),
            params: self.params.clone(),
            camera: self.camera.clone(),
            test_mode: request.test_mode,
        };

        match &request.command {
            Some(request::Command::GetMosaicSettings(_)) => {
                handlers::handle_get_mosaic_settings(&ctx).await
            }
            Some(request::Command::GetObjective(_)) => handlers::handle_get_objective(&ctx).await,
            Some(request::Command::GetStagePosition(_)) => {
                handlers::handle_get_stage_position(&ctx).await
            }
            Some(request::Command::MoveStage(cmd)) => handlers::handle_move_stage(&ctx, cmd).await,
            Some(request::Command::SetParameters(cmd)) => {
                handlers::handle_set_parameters(&ctx, cmd).await
            }
            Some(request::Command::TakeMovie(cmd)) => handlers::handle_take_movie(&ctx, cmd).await,
            None => Err(CommandError::InvalidRequest("empty command".into())),
        }
    }

    fn wrap(&self, response: Response) -> Envelope {
        let seq = self.sequence_id.fetch_add(1, Ordering::SeqCst) + 1;
        Envelope {
            header: Some(Header::new("scopelink-host", MessageType::MsgResponse, seq)),
            payload: Some(envelope::Payload::Response(response)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopelink_shared::{
        set_parameters, GetMosaicSettings, GetObjective, MoveStage, SetParameters,
    };

    fn executor() -> CommandExecutor {
        CommandExecutor::from_config(&HostConfig::default()).expect("default config")
    }

    fn header(seq: u64) -> Header {
        Header::new("test-client", MessageType::MsgRequest, seq)
    }

    fn response_of(envelope: Envelope) -> Response {
        match envelope.payload {
            Some(envelope::Payload::Response(response)) => response,
            other => panic!("expected response payload, got {:?}", other.is_some()),
        }
    }

    #[tokio::test]
    async fn test_empty_command_is_an_error() {
        let executor = executor();
        let request = Request {
            test_mode: false,
            command: None,
        };
        let response = response_of(executor.execute(&request, &header(1)).await);
        assert!(response.has_error());
        assert_eq!(response.request_sequence_id, 1);
    }

    #[tokio::test]
    async fn test_get_objective_reports_current() {
        let executor = executor();
        let request = Request::new(request::Command::GetObjective(GetObjective {}));
        let response = response_of(executor.execute(&request, &header(2)).await);
        assert!(!response.has_error());
        assert_eq!(response.text("objective"), Some("100x"));
    }

    #[tokio::test]
    async fn test_mosaic_settings_descriptor() {
        let executor = executor();
        let request = Request::new(request::Command::GetMosaicSettings(GetMosaicSettings {}));
        let response = response_of(executor.execute(&request, &header(3)).await);
        assert_eq!(response.text("obj1"), Some("100x,0.160,0.0,0.0"));
    }

    #[tokio::test]
    async fn test_move_stage_test_mode_is_synthetic() {
        let executor = executor();
        let request = Request::new(request::Command::MoveStage(MoveStage { x: 5.0, y: 5.0 }))
            .with_test_mode();
        let response = response_of(executor.execute(&request, &header(4)).await);
        assert!(!response.has_error());
        assert_eq!(response.integer("duration"), Some(1));
    }

    #[tokio::test]
    async fn test_set_parameters_unknown_fails_in_both_modes() {
        let executor = executor();
        let command = request::Command::SetParameters(SetParameters {
            target: Some(set_parameters::Target::Name("256x512".into())),
        });

        let real = response_of(executor.execute(&Request::new(command.clone()), &header(5)).await);
        let test = response_of(
            executor
                .execute(&Request::new(command).with_test_mode(), &header(6))
                .await,
        );
        assert!(real.has_error());
        assert!(test.has_error());
    }

    #[tokio::test]
    async fn test_reject_answers_with_error() {
        let executor = executor();
        let response = response_of(executor.reject(&header(9)));
        assert!(response.has_error());
        assert_eq!(response.request_sequence_id, 9);
    }
}
