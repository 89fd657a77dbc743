//! Types shared between the client controllers and the server contracts:
//! the filter/result domain model and the two HTTP request/response bodies.

pub mod domain;
pub mod protocol;
