use std::env;

use serde::{Deserialize, Serialize};

use crate::config::FactoryConfig;

/// Kept for backward compatibility: callers used to branch on a shim package.
pub const REQUIRES_COMPATIBILITY_SHIM: bool = false;

/// The native socket is always used now, so this never changes.
pub const HAS_RELIABLE_NATIVE_SOCKET: bool = true;

pub const DEFAULT_HOST_VERSION_VAR: &str = "NODE_VERSION";

/// Source of host runtime metadata.
pub trait EnvironmentProvider {
    /// Version string reported by the host runtime, `None` outside of it.
    fn host_version(&self) -> Option<String>;
}

impl<P: EnvironmentProvider + ?Sized> EnvironmentProvider for &P {
    fn host_version(&self) -> Option<String> {
        (**self).host_version()
    }
}

/// Reads the host version from the process environment at call time.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
    var: String,
}

impl ProcessEnvironment {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn from_config(config: &FactoryConfig) -> Self {
        Self::new(config.host_version_var.clone())
    }
}

impl Default for ProcessEnvironment {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_VERSION_VAR)
    }
}

impl EnvironmentProvider for ProcessEnvironment {
    fn host_version(&self) -> Option<String> {
        env::var_os(&self.var)
            .map(|version| version.to_string_lossy().into_owned())
            .filter(|version| !version.trim().is_empty())
    }
}

/// Fixed answer, for tests and for hosts that know their version up front.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    version: Option<String>,
}

impl StaticEnvironment {
    pub fn host(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
        }
    }

    pub fn absent() -> Self {
        Self { version: None }
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn host_version(&self) -> Option<String> {
        self.version.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub is_host_runtime: bool,
    pub host_major_version: Option<u32>,
    pub has_reliable_native_socket: bool,
    pub requires_shim_package: bool,
}

pub fn describe_environment_with<P: EnvironmentProvider + ?Sized>(provider: &P) -> EnvironmentInfo {
    let version = provider.host_version();

    EnvironmentInfo {
        is_host_runtime: version.is_some(),
        host_major_version: version.as_deref().and_then(major_version),
        has_reliable_native_socket: HAS_RELIABLE_NATIVE_SOCKET,
        requires_shim_package: REQUIRES_COMPATIBILITY_SHIM,
    }
}

/// Leading base 10 integer of a version string. Malformed input yields `None`.
fn major_version(version: &str) -> Option<u32> {
    let version = version.trim_start();
    let end = version.find(|c: char| !c.is_ascii_digit()).unwrap_or(version.len());
    version[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_version() {
        assert_eq!(major_version("20.11.0"), Some(20));
        assert_eq!(major_version("8"), Some(8));
        assert_eq!(major_version(" 18.0.0"), Some(18));
        assert_eq!(major_version("22abc"), Some(22));
        assert_eq!(major_version("v20.11.0"), None);
        assert_eq!(major_version("beta"), None);
        assert_eq!(major_version(""), None);
        assert_eq!(major_version("99999999999.0"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_process_environment_non_utf8_version() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("SOCKET_FACTORY_TEST_NON_UTF8_VERSION", OsStr::from_bytes(b"\xff20.1.0"));
        let provider = ProcessEnvironment::new("SOCKET_FACTORY_TEST_NON_UTF8_VERSION");

        let info = describe_environment_with(&provider);
        assert!(info.is_host_runtime);
        assert_eq!(info.host_major_version, None);
    }

    #[test]
    fn test_process_environment_missing_var() {
        let provider = ProcessEnvironment::new("SOCKET_FACTORY_TEST_VAR_THAT_IS_NEVER_SET");
        assert_eq!(provider.host_version(), None);
    }
}
