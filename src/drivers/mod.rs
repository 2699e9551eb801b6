// Device codec registry.

pub mod d868uv;

use std::collections::HashMap;
use std::sync::Mutex;

/// Information about one supported radio model.
#[derive(Debug, Clone)]
pub struct DriverInfo {
    pub vendor: String,
    pub model: String,
    pub description: String,
}

impl DriverInfo {
    pub fn new(
        vendor: impl Into<String>,
        model: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            description: description.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.vendor, self.model)
    }
}

lazy_static::lazy_static! {
    static ref DRIVER_REGISTRY: Mutex<HashMap<String, DriverInfo>> = Mutex::new(HashMap::new());
}

pub fn register_driver(info: DriverInfo) {
    let key = format!("{}::{}", info.vendor, info.model);
    DRIVER_REGISTRY.lock().unwrap().insert(key, info);
}

pub fn get_driver(vendor: &str, model: &str) -> Option<DriverInfo> {
    let key = format!("{}::{}", vendor, model);
    DRIVER_REGISTRY.lock().unwrap().get(&key).cloned()
}

pub fn list_drivers() -> Vec<DriverInfo> {
    let mut drivers: Vec<DriverInfo> =
        DRIVER_REGISTRY.lock().unwrap().values().cloned().collect();
    drivers.sort_by(|a, b| a.full_name().cmp(&b.full_name()));
    drivers
}

/// Register every codec this crate ships.
pub fn register_builtin() {
    register_driver(DriverInfo::new(
        "AnyTone",
        "AT-D868UV",
        "Dual-band DMR handheld, sparse bank layout",
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        register_builtin();
        let info = get_driver("AnyTone", "AT-D868UV").expect("builtin registered");
        assert_eq!(info.full_name(), "AnyTone AT-D868UV");
        assert!(list_drivers()
            .iter()
            .any(|d| d.model == "AT-D868UV"));
        assert!(get_driver("AnyTone", "AT-UNKNOWN").is_none());
    }
}
