
pub mod constants;
pub mod model;
pub mod net;
pub mod snapshot;
pub mod cycletrack;
pub mod eventtrack;
pub mod output;
pub mod coordinator;
pub mod config;
