//! Typed DTOs for the hotel-operations API.
//!
//! Wire shapes are normalized here, at the client boundary, so the rest
//! of the system only ever sees one canonical form of each concept.

pub mod auth;
pub mod bookings;
