pub mod transport;

pub use transport::HttpTransport;
pub use transport::Transport;
pub use transport::TransportError;
