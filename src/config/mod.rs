mod settings;

pub use settings::{HubConfig, JobsConfig, RoutingConfig, Settings};
