use std::time::Duration;

pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 8080;
pub(crate) const DEFAULT_DURATION: Duration = Duration::from_secs(300);
pub(crate) const DEFAULT_WARMUP: Duration = Duration::from_secs(60);
pub(crate) const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_LEVELS: [u32; 7] = [1, 5, 10, 30, 60, 90, 120];
pub(crate) const DEFAULT_SERVER_NAME: &str = "server";
pub(crate) const DEFAULT_GENERATOR: &str = "./load_generator";
/// Keeps client-side load generation off the cores the server runs on.
pub(crate) const DEFAULT_CPU_AFFINITY: &str = "2-4";
pub(crate) const DEFAULT_PROJECT: &str = "kv-store-scalability";
pub(crate) const DEFAULT_RUN_NAME_PREFIX: &str = "Auto_Scalability_Disk_Final";
pub(crate) const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_TRACKER_DIR: &str = "./runs";
