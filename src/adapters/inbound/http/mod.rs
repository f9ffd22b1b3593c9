pub mod dto;
pub mod handlers;
pub mod identity;
pub mod router;

pub use dto::*;
pub use handlers::*;
pub use identity::*;
pub use router::*;
