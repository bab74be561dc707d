pub mod client_ip;

pub use client_ip::{UNKNOWN_CLIENT, client_ip};
