//! Access control for the network transport
//!
//! A single shared secret guards the session endpoint. There is no per-user
//! identity: the `user_id` tools scope memories by is supplied by the caller
//! and is not tied to the token.

mod gate;

pub use gate::{
    bearer_gate, AccessGate, GateDecision, FORBIDDEN_MESSAGE, INVALID_FORMAT_MESSAGE,
    MISSING_HEADER_MESSAGE,
};
