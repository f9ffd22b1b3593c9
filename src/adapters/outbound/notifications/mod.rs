mod directory_gateway;
mod http_push_transport;
mod recording_transport;

pub use directory_gateway::DirectoryNotificationGateway;
pub use http_push_transport::{HttpPushTransport, DEFAULT_PUSH_ENDPOINT};
pub use recording_transport::RecordingPushTransport;
