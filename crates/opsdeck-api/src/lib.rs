// opsdeck-api: Async Rust client for the Opsdeck back-office REST API

pub mod client;
pub mod error;
pub mod session;
pub mod transport;
pub mod types;

mod auth;
mod inventory;
mod orders;
mod purchases;
mod reports;
mod suppliers;
mod users;

pub use client::BackofficeClient;
pub use error::Error;
pub use session::{
    MemorySessionStore, SessionHandle, SessionSignal, SessionSnapshot, SessionStore, TokenPair,
    UserProfile,
};
pub use transport::TransportConfig;
