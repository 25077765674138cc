mod scenes;

use anyhow::{Context, Result};
use clap::Parser;
use rtk_renderer::{save_bmp, to_rgb_image, RenderConfig, RenderStatus, Renderer, ToneMap};
use scenes::DemoScene;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const LOG_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(version, about = "Render a demo scene with the rtk ray tracer")]
struct Args {
    /// JSON render configuration; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Worker threads, one scanline band each
    #[arg(short, long)]
    threads: Option<usize>,

    /// Samples per pixel
    #[arg(long)]
    spp: Option<u32>,

    /// Maximum reflection depth
    #[arg(long)]
    depth: Option<u32>,

    #[arg(long, value_enum, default_value_t)]
    scene: DemoScene,

    /// Request a stop after this many seconds; finished rows are kept
    #[arg(long)]
    timeout: Option<f64>,

    /// Bitmap output path
    #[arg(short, long, default_value = "render.bmp")]
    output: PathBuf,

    /// Also write a PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Stretch exported images so the brightest channel reaches full scale
    #[arg(long)]
    normalize: bool,
}

impl Args {
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(spp) = self.spp {
            config.samples_per_pixel = spp;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        // Progress is polled from the main thread
        config.async_render = true;

        Ok(config)
    }

    fn tone_map(&self) -> ToneMap {
        if self.normalize {
            ToneMap::Normalize
        } else {
            ToneMap::Scale(255.0)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = args.render_config()?;
    log::info!("Starting rtk viewer: {:?} scene", args.scene);

    let aspect_ratio = config.width as f64 / config.height.max(1) as f64;
    let (scene, camera) = args.scene.build(aspect_ratio);
    let renderer = Renderer::new(config, camera).with_scene(scene);

    let start = Instant::now();
    let handles = renderer.start()?;

    let timeout = args.timeout.map(Duration::from_secs_f64);
    let mut stop_requested = false;
    let mut last_log = Instant::now();
    while renderer.is_render_in_progress() {
        thread::sleep(POLL_INTERVAL);

        if last_log.elapsed() >= LOG_INTERVAL {
            log::info!("Progress: {:.1}%", renderer.progress() * 100.0);
            last_log = Instant::now();
        }
        if !stop_requested && timeout.is_some_and(|t| start.elapsed() >= t) {
            log::warn!("Timeout reached, stopping render");
            renderer.request_render_stop();
            stop_requested = true;
        }
    }

    match Renderer::wait(handles) {
        RenderStatus::Completed => log::info!("Render finished in {:.2?}", start.elapsed()),
        RenderStatus::Cancelled => log::warn!(
            "Render stopped at {:.1}% after {:.2?}",
            renderer.progress() * 100.0,
            start.elapsed()
        ),
    }

    let tone = args.tone_map();
    let image = renderer.lock_image();
    save_bmp(&args.output, &image, tone)
        .with_context(|| format!("writing {}", args.output.display()))?;

    if let Some(path) = &args.png {
        to_rgb_image(&image, tone)?
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Saved PNG to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["rtk_viewer", "--width", "320", "--spp", "4", "--normalize"]);
        let config = args.render_config().unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, RenderConfig::default().height);
        assert_eq!(config.samples_per_pixel, 4);
        assert!(config.async_render);
        assert_eq!(args.tone_map(), ToneMap::Normalize);
    }

    #[test]
    fn test_default_export_scale() {
        let args = Args::parse_from(["rtk_viewer", "--scene", "sphere"]);
        assert_eq!(args.scene, DemoScene::Sphere);
        assert_eq!(args.tone_map(), ToneMap::Scale(255.0));
    }
}
