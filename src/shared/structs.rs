/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;

/***************************************/
/*        Direction constants          */
/***************************************/
pub const DIRN_UP: i8 = 1;
pub const DIRN_DOWN: i8 = -1;
pub const DIRN_STOP: i8 = 0;

pub const SPEED_STOP: u8 = 0;
pub const SPEED_MOVE: u8 = 1;

/***************************************/
/*       Public data structures        */
/***************************************/

/// One simulated cab, rebuilt from every turn snapshot.
///
/// `id` is not part of the wire format; the session stamps it with the
/// stringified index of the elevator in the snapshot list, so it is only
/// stable for the current turn. `busy` and `very_busy` are per-turn
/// scratch flags used by the dispatch passes and never persist.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Elevator {
    #[serde(skip)]
    pub id: String,
    pub floor: i64,
    #[serde(rename = "pressedButtons", default)]
    pub pressed_buttons: Vec<i64>,
    #[serde(skip)]
    pub busy: bool,
    #[serde(skip)]
    pub very_busy: bool,
}

/// One outstanding floor call from a waiting passenger.
///
/// `served` is a per-turn flag set once an elevator has been committed to
/// the request. Requests not served this turn are simply dropped; the
/// service re-reports them next turn if still outstanding.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub floor: i64,
    pub direction: i8,
    #[serde(skip)]
    pub served: bool,
}

/// Movement instruction for one elevator for this turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub direction: i8,
    pub speed: u8,
}

/// Per-elevator command mapping submitted each turn, keyed by elevator id.
pub type CommandSet = HashMap<String, Command>;

/***************************************/
/*          Wire payloads              */
/***************************************/

/// First-contact registration payload.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RegisterPayload {
    pub username: String,
    pub plan: String,
}

/// Per-turn command submission. `token` is serialized as `null` until the
/// service has issued one.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TurnPayload {
    pub token: Option<String>,
    pub commands: CommandSet,
}

/// Union of the outgoing payload shapes, serialized transparently.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Payload {
    Register(RegisterPayload),
    Turn(TurnPayload),
}

/// Every response shape the service sends, flattened into optional fields.
///
/// Which fields are present depends on the protocol phase: `token` and
/// `building` on the registration ack, `elevators`/`requests` on a turn
/// snapshot, `status`/`score`/`message` on completion or error.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ServerResponse {
    pub token: Option<String>,
    pub building: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub score: Option<i64>,
    pub elevators: Option<Vec<Elevator>>,
    pub requests: Option<Vec<Request>>,
}

impl Elevator {
    pub fn new(id: String, floor: i64, pressed_buttons: Vec<i64>) -> Elevator {
        Elevator {
            id,
            floor,
            pressed_buttons,
            busy: false,
            very_busy: false,
        }
    }
}

impl Request {
    pub fn new(floor: i64, direction: i8) -> Request {
        Request {
            floor,
            direction,
            served: false,
        }
    }
}
