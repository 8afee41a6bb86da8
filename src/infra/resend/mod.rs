mod client;

pub use client::ResendClient;
