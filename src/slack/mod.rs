pub mod client;
pub mod events;

pub use client::SlackClient;
