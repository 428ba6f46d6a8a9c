pub mod connection;
pub mod handshake;
pub mod sessions;

pub use handshake::{RejectReason, RoomTicket};
pub use sessions::RoomSessions;
