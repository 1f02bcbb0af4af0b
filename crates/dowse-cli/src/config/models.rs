use dowse::engine::config::{ClusterConfig, SolvationConfig};
use std::path::PathBuf;

pub struct SolvateAppConfig {
    pub pdb_path: PathBuf,
    pub vert_path: PathBuf,
    pub output_prefix: PathBuf,
    pub write_intermediates: bool,
    pub core_config: SolvationConfig,
}

pub struct ClusterAppConfig {
    pub input_path: PathBuf,
    pub output_prefix: PathBuf,
    pub core_config: ClusterConfig,
}
