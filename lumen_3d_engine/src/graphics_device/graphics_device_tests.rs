//! Unit tests for graphics_device.rs
//!
//! Tests Config defaults, DeviceStats and the plugin registry bookkeeping.
//! Device creation through a plugin needs a window and is not covered here.

use crate::graphics_device::{
    Config, DeviceStats, GraphicsDevice,
    register_graphics_device_plugin, with_graphics_device_plugin_registry,
};
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::error::Error;
use std::sync::{Arc, Mutex};

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.app_name, "Lumen3D Application");
    assert_eq!(config.app_version, (1, 0, 0));
    assert_eq!(config.enable_validation, cfg!(debug_assertions));
}

#[test]
fn test_device_stats_default_is_zero() {
    let stats = DeviceStats::default();
    assert_eq!(stats.draw_calls, 0);
    assert_eq!(stats.triangles, 0);
    assert_eq!(stats.gpu_memory_used, 0);
}

#[test]
fn test_register_plugin_is_visible_in_registry() {
    register_graphics_device_plugin("unit-test-mock", |_window, _config| {
        let device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(MockGraphicsDevice::new()));
        Ok(device)
    })
    .unwrap();

    let found = with_graphics_device_plugin_registry(|registry| {
        (registry.has_plugin("unit-test-mock"), registry.has_plugin("missing"))
    })
    .unwrap();

    assert_eq!(found, (true, false));
}

#[test]
fn test_plugin_factory_errors_are_device_errors() {
    register_graphics_device_plugin("unit-test-unavailable", |_window, _config| {
        Err(Error::DeviceUnavailable("no context".to_string()))
    })
    .unwrap();

    let registered = with_graphics_device_plugin_registry(|registry| {
        registry.has_plugin("unit-test-unavailable")
    })
    .unwrap();
    assert!(registered);
}
