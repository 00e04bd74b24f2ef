use std::fmt;

use serde::{Deserialize, Serialize};

use crate::environment::DEFAULT_HOST_VERSION_VAR;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// process environment variable holding the host runtime version
    #[serde(default = "default_host_version_var")]
    pub host_version_var: String,
    /// if set to true sockets are opened with TCP_NODELAY
    #[serde(default = "default_disable_nagle")]
    pub disable_nagle: bool,
}

fn default_host_version_var() -> String {
    DEFAULT_HOST_VERSION_VAR.to_owned()
}

fn default_disable_nagle() -> bool {
    true
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            host_version_var: default_host_version_var(),
            disable_nagle: default_disable_nagle(),
        }
    }
}

impl fmt::Display for FactoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FactoryConfig {{ host_version_var: \"{}\", disable_nagle: {} }}",
            self.host_version_var, self.disable_nagle
        )
    }
}
