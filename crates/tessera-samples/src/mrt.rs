//! Four constant colors rendered into four offscreen targets in one draw,
//! then tiled into the window's quadrants.

use anyhow::{Context, Result};

use tessera_engine::coords::Viewport;
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::device::Gpu;
use tessera_engine::render::{FrameDriver, FrameError, FrameOutcome, MrtConfig, MrtPipeline};

pub struct MrtApp {
    config: MrtConfig,
    driver: Option<FrameDriver>,
    last_viewport: Option<Viewport>,
}

impl MrtApp {
    pub fn new(config: MrtConfig) -> Self {
        Self {
            config,
            driver: None,
            last_viewport: None,
        }
    }
}

impl Default for MrtApp {
    fn default() -> Self {
        Self::new(MrtConfig::default())
    }
}

impl App for MrtApp {
    fn on_init(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let pipeline = MrtPipeline::new(gpu.device(), gpu.surface_format(), &self.config)
            .context("failed to build MRT pipeline")?;
        self.driver = Some(FrameDriver::new(pipeline));
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(driver) = self.driver.as_mut() else {
            return Ok(AppControl::Continue);
        };

        if self.last_viewport != Some(ctx.viewport) {
            log::info!("composite viewport {}x{}", ctx.viewport.width, ctx.viewport.height);
            self.last_viewport = Some(ctx.viewport);
        }

        match driver.render_frame(ctx.gpu, ctx.window.window) {
            Ok(FrameOutcome::Presented) => Ok(AppControl::Continue),
            Ok(FrameOutcome::Skipped(action)) => {
                log::debug!("frame {} skipped: {action:?}", ctx.frame_index);
                Ok(AppControl::Continue)
            }
            Err(FrameError::SurfaceFatal) => {
                log::error!("presentation surface lost for good; exiting");
                Ok(AppControl::Exit)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn on_shutdown(&mut self) {
        if let Some(driver) = self.driver.take() {
            let stats = driver.stats();
            log::info!(
                "mrt: {} presented, {} dropped, {} skipped",
                stats.presented,
                stats.dropped,
                stats.skipped
            );
            driver.destroy();
        }
    }
}
