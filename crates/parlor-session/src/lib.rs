//! Connection identity for Parlor.
//!
//! This crate handles who is on the other end of each connection:
//!
//! 1. **Verification** — turning an auth token into an [`Identity`]
//!    ([`IdentityVerifier`] trait, implemented by the host application)
//! 2. **Tracking** — mapping live connections to identities and rooms
//!    ([`ConnectionRegistry`])
//!
//! The registry knows nothing about game rules or room internals; it
//! answers "who is this connection" and "where are they seated".

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod registry;

pub use auth::{Identity, IdentityVerifier};
pub use error::{AuthError, RegistryError};
pub use registry::{ConnectionEntry, ConnectionRegistry};
