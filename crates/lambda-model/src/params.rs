/// User-level parameters of one run, as collected by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Target pool the units are scheduled into.
    pub pool: String,
    /// Image reference to run.
    pub image: String,
    /// Logical entrypoint name inside the manifest.
    pub name: String,
    /// Literal command line executed by the entrypoint.
    pub command: String,
    /// Network the units join.
    pub network: String,
    /// Working directory of the entrypoint.
    pub working_dir: String,
    /// Environment entries (`KEY=VALUE`), not yet namespaced.
    pub env: Vec<String>,
    /// Volume mount specs, passed through to the manifest.
    pub volumes: Vec<String>,
    /// CPU quota as a fractional core count.
    pub cpu: f64,
    /// Memory limit in bytes.
    pub memory: i64,
    /// Number of replicas to spawn.
    pub count: i32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            pool: String::new(),
            image: String::new(),
            name: "run".to_string(),
            command: String::new(),
            network: "bridge".to_string(),
            working_dir: "/".to_string(),
            env: Vec::new(),
            volumes: Vec::new(),
            cpu: 1.0,
            memory: 512 * 1024 * 1024,
            count: 1,
        }
    }
}
