mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_cluster_config, build_solvate_config};
pub use models::{ClusterAppConfig, SolvateAppConfig};
