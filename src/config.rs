//! Store application configuration that gets read from disk
use crate::services::{
    new_location_handler, new_presentation_handler, LocationSource, RoutePresenter,
};
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::io::prelude::*;
use std::iter::Iterator;
use std::str::FromStr;

/// Defines the allowed keys under the services map
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Location,
    Presentation,
}

/// Type alias for clarity
pub type ServiceParameters = HashMap<String, Value>;

/// Configuration options for a single service of any type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    handler: String,
    #[serde(default)]
    configuration: ServiceParameters,
}

impl ServiceConfig {
    pub fn new(handler: String) -> Self {
        ServiceConfig {
            handler,
            configuration: HashMap::new(),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn parameters(&self) -> impl Iterator<Item = &String> + '_ {
        self.configuration.keys()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.configuration.get(key)
    }

    pub fn get_parameter_as_string(&self, key: &str) -> Option<Result<String, Error>> {
        if let Some(value) = self.configuration.get(key) {
            let value = value
                .as_str()
                .ok_or_else(|| {
                    Error::InvalidConfigurationValue(format!(
                        "invalid value for {}.{}, expected a string: {:?}",
                        &self.handler, key, value
                    ))
                })
                .map(|v| v.to_string());
            Some(value)
        } else {
            None
        }
    }

    pub fn get_parameter_as_i64(&self, key: &str) -> Option<Result<i64, Error>> {
        if let Some(value) = self.configuration.get(key) {
            let value = value.as_i64().ok_or_else(|| {
                Error::InvalidConfigurationValue(format!(
                    "invalid value for {}.{}, expected an integer: {:?}",
                    &self.handler, key, value
                ))
            });
            Some(value)
        } else {
            None
        }
    }

    pub fn get_parameter_as_f64(&self, key: &str) -> Option<Result<f64, Error>> {
        if let Some(value) = self.configuration.get(key) {
            let value = value.as_f64().ok_or_else(|| {
                Error::InvalidConfigurationValue(format!(
                    "invalid value for {}.{}, expected a floating point value: {:?}",
                    &self.handler, key, value
                ))
            });
            Some(value)
        } else {
            None
        }
    }
}

/// Build a service instance with default parameters overridden from a ServiceConfig
pub trait FromServiceConfig: Default {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error>
    where
        Self: Sized;
}

/// Set a string parameter on the service instance from a ServiceConfig instance
#[macro_export]
macro_rules! set_string_param_from_config {
    ($b:expr, $k:ident, $c:expr) => {
        if let Some(val) = $c.get_parameter_as_string(stringify!($k)) {
            $b.$k = val?
        }
    };
}

#[macro_export]
macro_rules! set_int_param_from_config {
    ($b:expr, $k:ident, $c:expr, $o:ident) => {
        if let Some(val) = $c.get_parameter_as_i64(stringify!($k)) {
            $b.$k = val? as $o
        }
    };
}

#[macro_export]
macro_rules! set_float_param_from_config {
    ($b:expr, $k:ident, $c:expr, $o:ident) => {
        if let Some(val) = $c.get_parameter_as_f64(stringify!($k)) {
            $b.$k = val? as $o
        }
    };
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter",
        default = "default_level_filter"
    )]
    log_level: LevelFilter,
    #[serde(default)]
    services: HashMap<ServiceType, ServiceConfig>,
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(source)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn get_location_handler(&self) -> Result<Box<dyn LocationSource>, Error> {
        match self.services.get(&ServiceType::Location) {
            Some(cfg) => new_location_handler(cfg),
            None => {
                // replay the built in track by default so the application
                // works out of the box without a config file
                new_location_handler(&ServiceConfig::new("replay".to_string()))
            }
        }
    }

    pub fn get_presentation_handler(&self) -> Result<Box<dyn RoutePresenter>, Error> {
        match self.services.get(&ServiceType::Presentation) {
            Some(cfg) => new_presentation_handler(cfg),
            None => {
                // use the console as default presenter since we always have that
                new_presentation_handler(&ServiceConfig::new("console".to_string()))
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            services: HashMap::new(),
        }
    }
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLE_CONFIG: &str = "\
log_level: debug
services:
  location:
    handler: replay
    configuration:
      interval_seconds: 0.5
  presentation:
    handler: console
";

    #[test]
    fn load_from_yaml() {
        let config = Config::load(&mut SAMPLE_CONFIG.as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        let cfg = config.services.get(&ServiceType::Location).unwrap();
        assert_eq!(cfg.handler(), "replay");
        assert_eq!(
            cfg.get_parameter_as_f64("interval_seconds").unwrap().unwrap(),
            0.5
        );
    }

    #[test]
    fn typed_parameter_accessors_reject_mismatches() {
        let config = Config::load(&mut SAMPLE_CONFIG.as_bytes()).unwrap();
        let cfg = config.services.get(&ServiceType::Location).unwrap();
        assert!(cfg
            .get_parameter_as_string("interval_seconds")
            .unwrap()
            .is_err());
        assert!(cfg.get_parameter_as_i64("missing").is_none());
    }

    #[test]
    fn handlers_default_when_services_are_not_configured() {
        let config = Config::default();
        assert!(config.get_location_handler().is_ok());
        assert!(config.get_presentation_handler().is_ok());
    }
}
