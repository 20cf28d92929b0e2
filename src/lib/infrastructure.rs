//! Adapters between the domain and the outside world

pub mod email;
pub mod http;
pub mod logging;
