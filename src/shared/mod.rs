pub mod macros;
pub mod structs;

pub use structs::Command;
pub use structs::CommandSet;
pub use structs::Elevator;
pub use structs::Payload;
pub use structs::RegisterPayload;
pub use structs::Request;
pub use structs::ServerResponse;
pub use structs::TurnPayload;
