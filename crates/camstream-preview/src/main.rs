mod app;
mod capture;

use anyhow::Result;
use camstream_engine::device::SurfaceInit;
use camstream_engine::logging::{init_logging, LoggingConfig};
use camstream_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use app::PreviewApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "camstream preview".to_string(),
        initial_size: LogicalSize::new(960.0, 540.0),
    };

    Runtime::run(config, SurfaceInit::default(), PreviewApp::new(45.0))
}
