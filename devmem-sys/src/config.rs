use std::{env, sync::OnceLock};

use crate::{device::DeviceSelector, error::ConfigError};

/// Selects the default device: `default`, `gpu` or `cpu`.
pub const DEFAULT_DEVICE_ENV: &str = "DEVMEM_DEFAULT_DEVICE";
/// Number of accelerators the platform exposes.
pub const GPU_COUNT_ENV: &str = "DEVMEM_GPU_COUNT";
/// Global memory per accelerator, in bytes. Accepts a `K`, `M` or `G` suffix.
pub const DEVICE_MEMORY_ENV: &str = "DEVMEM_DEVICE_MEMORY";

const DEFAULT_DEVICE_MEMORY: usize = 2 << 30;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Runtime configuration. Fixed the first time the platform is queried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Selector used whenever a queue is built without an explicit device.
    pub default_device: DeviceSelector,
    /// Number of accelerators. A host device is always present on top of these.
    pub gpu_count: usize,
    /// Global memory of every device, in bytes.
    pub device_memory: usize,
}

impl Default for Config {
    fn default() -> Self {
        let default_device = if cfg!(feature = "default-gpu") {
            DeviceSelector::Gpu
        } else {
            DeviceSelector::Default
        };

        Self {
            default_device,
            gpu_count: 1,
            device_memory: DEFAULT_DEVICE_MEMORY,
        }
    }
}

impl Config {
    /// Reads the configuration from the `DEVMEM_*` environment variables,
    /// falling back to the defaults for any that are unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = var(DEFAULT_DEVICE_ENV) {
            config.default_device = value.parse()?;
        }
        if let Some(value) = var(GPU_COUNT_ENV) {
            config.gpu_count = value
                .trim()
                .parse()
                .map_err(|_| invalid(GPU_COUNT_ENV, value))?;
        }
        if let Some(value) = var(DEVICE_MEMORY_ENV) {
            config.device_memory =
                parse_bytes(&value).ok_or_else(|| invalid(DEVICE_MEMORY_ENV, value))?;
        }

        Ok(config)
    }

    /// Installs this configuration for the rest of the process.
    ///
    /// Must happen before the first device, context or queue is created.
    pub fn install(self) -> Result<(), ConfigError> {
        CONFIG
            .set(self)
            .map_err(|_| ConfigError::AlreadyInitialized)
    }

    /// The active configuration. Read from the environment on first use.
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(|| match Config::from_env() {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring devmem environment configuration: {err}");
                Config::default()
            }
        })
    }
}

/// The configured default device selector.
pub fn default_selector() -> DeviceSelector {
    Config::get().default_device
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { key, value }
}

fn parse_bytes(value: &str) -> Option<usize> {
    let value = value.trim();
    let (digits, shift) = match value.as_bytes().last()? {
        b'K' | b'k' => (&value[..value.len() - 1], 10),
        b'M' | b'm' => (&value[..value.len() - 1], 20),
        b'G' | b'g' => (&value[..value.len() - 1], 30),
        _ => (value, 0),
    };
    let n: usize = digits.trim().parse().ok()?;
    n.checked_mul(1usize.checked_shl(shift)?)
}

#[cfg(test)]
mod tests {
    use super::{parse_bytes, Config};
    use crate::{device::DeviceSelector, error::ConfigError};

    #[test]
    fn bytes() {
        assert_eq!(parse_bytes("4096"), Some(4096));
        assert_eq!(parse_bytes(" 16K "), Some(16 << 10));
        assert_eq!(parse_bytes("2m"), Some(2 << 20));
        assert_eq!(parse_bytes("1G"), Some(1 << 30));
        assert_eq!(parse_bytes("G"), None);
        assert_eq!(parse_bytes("lots"), None);
        assert_eq!(parse_bytes(&format!("{}G", usize::MAX)), None);
    }

    #[test]
    fn selector() {
        assert_eq!("gpu".parse(), Ok(DeviceSelector::Gpu));
        assert_eq!("CPU".parse(), Ok(DeviceSelector::Cpu));
        assert_eq!("default".parse(), Ok(DeviceSelector::Default));
        assert!(matches!(
            "tpu".parse::<DeviceSelector>(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn install_after_use() {
        let _ = Config::get();
        assert_eq!(
            Config::default().install(),
            Err(ConfigError::AlreadyInitialized)
        );
    }
}
