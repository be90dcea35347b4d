// Supporting modules
pub mod config;
pub mod error;

// Payload composition and routing
pub mod notification;
pub mod routing;
pub mod template;

// Delivery
pub mod sink;

// Jobs and the tasks that drive them
pub mod jobs;
pub mod tasks;
