pub mod connect;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod session;
pub mod state;

pub use connect::{ConnectionBoard, ConnectionFlow, ConnectionStatus, Web3Outcome};
pub use error::{ApiError, Result};
pub use router::create_router;
pub use server::run_server;
pub use session::{IdentitySession, RequestSession};
pub use state::AppState;
