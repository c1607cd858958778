/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, error, info, warn};
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ClientConfig;
use crate::dispatch::DispatchEngine;
use crate::shared::{CommandSet, Payload, RegisterPayload, ServerResponse, TurnPayload};
use crate::transport::{Transport, TransportError};

/***************************************/
/*               Enums                 */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Init,
    Started,
    InProgress,
    Done,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// The service answered `status == "error"`. Fatal: the run stops and
    /// no further submission is made.
    #[error("service reported an error: {message}")]
    Protocol { message: String },
    /// A response was missing a field the current state cannot proceed
    /// without.
    #[error("malformed {context} response: missing `{field}` field")]
    MalformedResponse {
        context: &'static str,
        field: &'static str,
    },
    /// The state machine was advanced without a response in a state that
    /// requires one. `start()` never does this; it guards misuse of
    /// `next_state`.
    #[error("no response available in state {state:?}")]
    MissingResponse { state: LifecycleState },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/***************************************/
/*       Public data structures        */
/***************************************/

/// Cross-turn controller state, owned exclusively by the state machine.
pub struct Session {
    pub token: Option<String>,
    pub endpoint: String,
    pub state: LifecycleState,
    pub turn: u64,
    pub score: Option<i64>,
}

/**
 * Protocol state machine driving one simulation run end-to-end.
 *
 * The machine is fully reactive: `start()` triggers the first transition
 * with no data, and every later transition is driven by the response the
 * transport delivers for the previous submission. Exactly one submission is
 * outstanding at any time.
 *
 * Lifecycle: INIT --start()--> STARTED --ack--> INPROGRESS --snapshot-->
 * INPROGRESS (self-loop, one dispatch per turn) --finished--> DONE.
 *
 * The dispatch engine only ever sees the per-turn snapshot and only ever
 * returns the per-turn command mapping; it never touches `Session`.
 *
 * # Fields
 * - `transport`:   performs the request/response exchange for each turn.
 * - `engine`:      per-turn dispatch decision engine.
 * - `username`:    identity sent in the registration payload.
 * - `plan`:        simulation plan sent in the registration payload.
 * - `session`:     token, endpoint, lifecycle state, turn counter, score.
 */
pub struct SessionStateMachine<T: Transport> {
    transport: T,
    engine: DispatchEngine,
    username: String,
    plan: String,
    session: Session,
}

impl<T: Transport> SessionStateMachine<T> {
    pub fn new(config: &ClientConfig, engine: DispatchEngine, transport: T) -> SessionStateMachine<T> {
        SessionStateMachine {
            transport,
            engine,
            username: config.username.clone(),
            plan: config.plan.clone(),
            session: Session {
                token: None,
                endpoint: config.registration_url.clone(),
                state: LifecycleState::Init,
                turn: 0,
                score: None,
            },
        }
    }

    /// Drives the protocol from registration to completion and returns the
    /// final score.
    pub fn start(&mut self) -> Result<i64, SessionError> {
        let mut response = self.next_state(None)?;
        while let Some(r) = response {
            response = self.next_state(Some(r))?;
        }
        self.session.score.ok_or(SessionError::MalformedResponse {
            context: "completion",
            field: "score",
        })
    }

    /// Performs one transition. Returns the response to feed into the next
    /// transition, or `None` once the run is done.
    pub(crate) fn next_state(
        &mut self,
        response: Option<ServerResponse>,
    ) -> Result<Option<ServerResponse>, SessionError> {
        if let Some(ref response) = response {
            // One increment per received response, before any handler runs.
            self.session.turn += 1;

            // Token refresh wins over the error check: a response carrying
            // both is treated as a refresh.
            if let Some(token) = &response.token {
                self.session.token = Some(token.clone());
            } else if response.status.as_deref() == Some("error") {
                let message = response.message.clone().unwrap_or_default();
                error!("FATAL {}", message);
                return Err(SessionError::Protocol { message });
            }
        }

        match (self.session.state, response) {
            (LifecycleState::Init, _) => self.handle_init().map(Some),
            (LifecycleState::Started, Some(response)) => self.handle_started(response).map(Some),
            (LifecycleState::InProgress, Some(response)) => self.handle_in_progress(response),
            (LifecycleState::Done, _) => {
                self.handle_done();
                Ok(None)
            }
            (state, None) => Err(SessionError::MissingResponse { state }),
        }
    }

    // INIT: submit the registration payload to the registration URL.
    fn handle_init(&mut self) -> Result<ServerResponse, SessionError> {
        info!("Registering as {} on plan {}", self.username, self.plan);
        self.session.state = LifecycleState::Started;
        self.submit(Payload::Register(RegisterPayload {
            username: self.username.clone(),
            plan: self.plan.clone(),
        }))
    }

    // STARTED: adopt the building endpoint and kick the run off with an
    // empty command set.
    fn handle_started(&mut self, response: ServerResponse) -> Result<ServerResponse, SessionError> {
        let building = response
            .building
            .ok_or(SessionError::MalformedResponse {
                context: "registration ack",
                field: "building",
            })?;
        debug!("Assigned building endpoint {}", building);
        self.session.endpoint = building;
        self.session.state = LifecycleState::InProgress;
        self.submit_commands(CommandSet::new())
    }

    // INPROGRESS: one dispatch per snapshot, or the transition to DONE.
    fn handle_in_progress(
        &mut self,
        response: ServerResponse,
    ) -> Result<Option<ServerResponse>, SessionError> {
        if response.status.as_deref() == Some("finished") {
            let score = response.score.ok_or(SessionError::MalformedResponse {
                context: "completion",
                field: "score",
            })?;
            self.session.score = Some(score);
            self.session.state = LifecycleState::Done;
            return self.next_state(None);
        }

        let commands = match (response.elevators, response.requests) {
            (Some(mut elevators), Some(mut requests)) => {
                // Ids are the positional indices in the snapshot list.
                for (i, elevator) in elevators.iter_mut().enumerate() {
                    elevator.id = i.to_string();
                }
                let commands = self.engine.plan(&mut elevators, &mut requests);
                debug!(
                    "Turn {}: {} elevators, {} requests, {} commands",
                    self.session.turn,
                    elevators.len(),
                    requests.len(),
                    commands.len()
                );
                commands
            }
            _ => {
                // Recoverable: skip dispatch this turn but keep the loop
                // alive with an empty command set.
                warn!(
                    "Turn {}: snapshot missing elevators/requests, skipping dispatch",
                    self.session.turn
                );
                CommandSet::new()
            }
        };

        self.submit_commands(commands).map(Some)
    }

    // DONE: report the final score.
    fn handle_done(&self) {
        info!(
            "Done! Score: {} ({} turns)",
            self.session.score.unwrap_or_default(),
            self.session.turn
        );
    }

    fn submit(&self, payload: Payload) -> Result<ServerResponse, SessionError> {
        Ok(self.transport.submit(&self.session.endpoint, &payload)?)
    }

    fn submit_commands(&self, commands: CommandSet) -> Result<ServerResponse, SessionError> {
        self.submit(Payload::Turn(TurnPayload {
            token: self.session.token.clone(),
            commands,
        }))
    }

    pub fn state(&self) -> LifecycleState {
        self.session.state
    }

    pub fn turn(&self) -> u64 {
        self.session.turn
    }

    pub fn score(&self) -> Option<i64> {
        self.session.score
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn endpoint(&self) -> &str {
        &self.session.endpoint
    }
}
