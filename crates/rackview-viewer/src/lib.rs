//! Rackview Viewer - Data-center floor visualization
//!
//! Hosts the floor scene in a native window or a browser canvas.

pub mod app;

/// Layout bundled into the WASM build, which has no filesystem
pub const DEMO_LAYOUT: &str = include_str!("../../../assets/layouts/demo.toml");

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    let layout = rackview_core::FloorLayout::from_toml(DEMO_LAYOUT).unwrap_or_else(|e| {
        tracing::error!("Bundled layout is invalid, using the default floor: {}", e);
        rackview_core::FloorLayout::default_floor()
    });

    app::run(rackview_core::ViewerConfig::default(), layout);
}
