pub mod config;
pub mod logging;

pub mod classify;
pub mod pattern;
pub mod report;
pub mod request;
pub mod response;
pub mod response_log;
pub mod scheduler;
pub mod token;
pub mod transport;
