//! Perfect-negotiation state machine for the interview room.
//!
//! Each endpoint runs one [`Negotiator`] per peer connection. The machine is
//! transport-agnostic: it never talks to the relay itself, it only tells the
//! embedder what to apply and what to send. Roles are fixed at connect time
//! from the endpoint's own role claim (HR impolite, candidate polite), so
//! both sides know the tie-break without an extra round-trip.
//!
//! When more than two identities share a room (an auditor sitting in), the
//! embedder feeds this machine only the messages from its chosen peer and
//! drops the rest; the machine itself never sees sender identities.

pub mod negotiation;

pub use negotiation::{
    AnswerDisposition, DescriptionKind, Negotiator, OfferDisposition, SessionDescription,
    SignalingState,
};
