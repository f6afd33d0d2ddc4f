//! Loopback listener that captures the Twitch redirect for local logins.

mod http;
mod server;
mod target;

pub use server::LocalServer;
