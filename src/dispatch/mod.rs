pub mod dispatch;
pub mod dispatch_tests;

pub use dispatch::route_to_floor;
pub use dispatch::DispatchEngine;
