// Core module - Session lifecycle and line pumps
pub mod pump;
pub mod session;
pub mod transport;
