// Session module - One connection driven by two pumps
pub mod session;
pub mod state;

pub use session::Session;
pub use state::{PumpExit, PumpReport, SessionSummary};
