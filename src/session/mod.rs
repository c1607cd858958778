pub mod session;

pub use session::LifecycleState;
pub use session::SessionError;
pub use session::SessionStateMachine;
