// Network layer: API payload types and the polling HTTP client

pub mod api;
pub mod messages;
