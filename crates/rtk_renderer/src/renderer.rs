//! Scanline renderer.
//!
//! Splits the image into horizontal bands and renders each band on its own
//! OS thread. Workers write straight into the shared framebuffer (each owns
//! its rows) and poll a cancellation token between rows.

use crate::{Camera, Color, FrameBuffer, RenderError, Result, Scene};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, Range};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Samples per pixel, averaged
    pub samples_per_pixel: u32,
    /// Maximum reflection depth (1 = direct lighting only)
    pub max_depth: u32,
    /// Worker threads for `Renderer::start`
    pub threads: usize,
    /// Return worker handles instead of joining them
    pub async_render: bool,
    /// Jitter samples inside the pixel instead of using the centre
    pub jitter_samples: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            samples_per_pixel: 1,
            max_depth: 6,
            threads: 4,
            async_render: false,
            jitter_samples: false,
        }
    }
}

/// How a render pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Completed,
    /// Stopped at a row boundary; rows rendered so far are kept.
    Cancelled,
}

/// Shared stop flag checked by workers between rows.
#[derive(Debug, Clone, Default)]
struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Handle to an asynchronously running band worker.
pub type RenderHandle = JoinHandle<RenderStatus>;

/// State shared between the renderer and its workers.
#[derive(Default)]
struct RenderState {
    image: Mutex<Arc<FrameBuffer>>,
    in_progress: AtomicUsize,
    rows_done: AtomicUsize,
    rows_total: AtomicUsize,
    cancel: CancelToken,
}

impl RenderState {
    fn current(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Arc<FrameBuffer>> {
        self.image.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restart the row counters for a pass over `rows` rows.
    fn begin_pass(&self, rows: usize) {
        self.rows_done.store(0, Ordering::Relaxed);
        self.rows_total.store(rows, Ordering::Relaxed);
    }

    /// Buffer with the requested size, reallocated (zeroed) if it differs.
    fn framebuffer(&self, width: usize, height: usize) -> Arc<FrameBuffer> {
        let mut image = self.lock();
        if !image.matches(width, height) {
            log::debug!("Allocating {}x{} framebuffer", width, height);
            *image = Arc::new(FrameBuffer::new(width, height));
        }
        Arc::clone(&image)
    }
}

/// Counts a running worker for as long as it is alive.
struct InProgressGuard(Arc<RenderState>);

impl InProgressGuard {
    fn new(state: Arc<RenderState>) -> Self {
        state.in_progress.fetch_add(1, Ordering::AcqRel);
        Self(state)
    }
}

impl Drop for InProgressGuard {
    fn drop(&mut self) {
        self.0.in_progress.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Exclusive view of the framebuffer; resizes wait until it is dropped.
pub struct ImageGuard<'a> {
    guard: MutexGuard<'a, Arc<FrameBuffer>>,
}

impl Deref for ImageGuard<'_> {
    type Target = FrameBuffer;

    fn deref(&self) -> &FrameBuffer {
        &self.guard
    }
}

/// Everything a worker thread needs, detached from the renderer.
#[derive(Clone)]
struct RenderJob {
    camera: Camera,
    config: RenderConfig,
    scene: Arc<Scene>,
    state: Arc<RenderState>,
}

impl RenderJob {
    fn run<F>(&self, rows: Range<usize>, mut progress: F) -> RenderStatus
    where
        F: FnMut(usize, usize, f64) -> bool,
    {
        let width = self.config.width;
        let height = self.config.height;
        let image = self.state.framebuffer(width, height);

        let rows = rows.start.min(height)..rows.end.min(height);
        let total = rows.len();
        let samples = self.config.samples_per_pixel.max(1);
        let mut rng = rand::thread_rng();

        for (done, y) in rows.enumerate() {
            // Camera rows count up from the bottom of the image
            let j = height - 1 - y;

            for x in 0..width {
                let mut pixel = Color::ZERO;
                for _ in 0..samples {
                    let (du, dv) = if self.config.jitter_samples {
                        (rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5)
                    } else {
                        (0.0, 0.0)
                    };
                    let u = image_coord(x as f64 + du, width);
                    let v = image_coord(j as f64 + dv, height);
                    let ray = self.camera.get_ray(u, v);
                    pixel += self.scene.ray_color(&ray, self.config.max_depth);
                }
                image.set(x, y, pixel / samples as f64);
            }

            self.state.rows_done.fetch_add(1, Ordering::Relaxed);
            let done = done + 1;
            if !progress(done, total, done as f64 / total as f64) {
                log::debug!("Render stopped after {} of {} rows", done, total);
                return RenderStatus::Cancelled;
            }
        }

        RenderStatus::Completed
    }
}

/// Pixel index to viewport coordinate in `[0, 1]`.
fn image_coord(coord: f64, extent: usize) -> f64 {
    if extent > 1 {
        coord / (extent - 1) as f64
    } else {
        0.5
    }
}

/// Split `[0, height)` into `threads` contiguous bands.
///
/// Every band gets `height / threads` rows and the last one also takes the
/// remainder. Bands may be empty when `height < threads`.
pub fn scanline_bands(height: usize, threads: usize) -> Vec<Range<usize>> {
    let threads = threads.max(1);
    let step = height / threads;

    let mut bands = Vec::with_capacity(threads);
    let mut from = 0;
    for i in 0..threads {
        let mut to = from + step;
        if i == threads - 1 {
            to += height % threads;
        }
        bands.push(from..to);
        from = to;
    }
    bands
}

/// Drives a scene through the camera into the framebuffer.
pub struct Renderer {
    pub camera: Camera,
    pub config: RenderConfig,
    pub scene: Option<Arc<Scene>>,
    state: Arc<RenderState>,
}

impl Renderer {
    /// Create a renderer with no scene attached.
    pub fn new(config: RenderConfig, camera: Camera) -> Self {
        Self {
            camera,
            config,
            scene: None,
            state: Arc::new(RenderState::default()),
        }
    }

    /// Attach the scene to render.
    pub fn with_scene(mut self, scene: impl Into<Arc<Scene>>) -> Self {
        self.scene = Some(scene.into());
        self
    }

    /// Validate inputs and snapshot what the workers need.
    fn job(&self) -> Result<RenderJob> {
        let checked = match &self.scene {
            None => Err(RenderError::NoScene),
            Some(scene) if scene.world.is_none() => Err(RenderError::NoWorld),
            Some(scene) if scene.lights.is_empty() => Err(RenderError::NoLights),
            Some(scene) => Ok(Arc::clone(scene)),
        };

        match checked {
            Ok(scene) => Ok(RenderJob {
                camera: self.camera.clone(),
                config: self.config.clone(),
                scene,
                state: Arc::clone(&self.state),
            }),
            Err(err) => {
                log::error!("Render skipped: {}", err);
                Err(err)
            }
        }
    }

    /// Render framebuffer rows `rows` (row 0 is the top) on the calling thread.
    ///
    /// `progress(rows_done, rows_total, fraction)` runs after every row;
    /// returning `false` stops the pass with [`RenderStatus::Cancelled`].
    pub fn render<F>(&self, rows: Range<usize>, progress: F) -> Result<RenderStatus>
    where
        F: FnMut(usize, usize, f64) -> bool,
    {
        let job = self.job()?;
        let height = self.config.height;
        let rows = rows.start.min(height)..rows.end.min(height);
        self.state.begin_pass(rows.len());

        let _guard = InProgressGuard::new(Arc::clone(&self.state));
        Ok(job.run(rows, progress))
    }

    /// Render the whole image on the calling thread.
    pub fn render_all(&self) -> Result<RenderStatus> {
        self.render(0..self.config.height, |_, _, _| true)
    }

    /// Render with `config.threads` workers, honouring `config.async_render`.
    pub fn start(&self) -> Result<Vec<RenderHandle>> {
        self.render_multi_threaded(self.config.threads, self.config.async_render)
    }

    /// Render on `threads` band workers.
    ///
    /// With `run_async` the worker handles are returned immediately and the
    /// caller joins them (see [`Renderer::wait`]); otherwise this blocks until
    /// every band finishes and returns no handles.
    pub fn render_multi_threaded(&self, threads: usize, run_async: bool) -> Result<Vec<RenderHandle>> {
        self.state.cancel.reset();
        let job = self.job()?;

        let height = self.config.height;
        self.state.begin_pass(height);

        log::info!(
            "Rendering {}x{} @ {} spp, depth {} on {} threads",
            self.config.width,
            height,
            self.config.samples_per_pixel,
            self.config.max_depth,
            threads.max(1)
        );
        let start = Instant::now();

        let mut handles = Vec::new();
        for (i, band) in scanline_bands(height, threads).into_iter().enumerate() {
            if band.is_empty() {
                continue;
            }

            let job = job.clone();
            // Counted before spawning so pollers never see a false "idle"
            let guard = InProgressGuard::new(Arc::clone(&self.state));
            let spawned = thread::Builder::new()
                .name(format!("rtk-band-{}", i))
                .spawn(move || {
                    let _guard = guard;
                    log::debug!("Band {} rendering rows {:?}", i, band);
                    let cancel = job.state.cancel.clone();
                    job.run(band, |_, _, _| !cancel.is_cancelled())
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    self.request_render_stop();
                    Self::wait(handles);
                    return Err(RenderError::Spawn(err));
                }
            }
        }

        if run_async {
            return Ok(handles);
        }

        match Self::wait(handles) {
            RenderStatus::Completed => log::info!("Render finished in {:.2?}", start.elapsed()),
            RenderStatus::Cancelled => log::info!("Render cancelled after {:.2?}", start.elapsed()),
        }
        Ok(Vec::new())
    }

    /// Join worker handles, logging any that panicked.
    ///
    /// Reports `Cancelled` if any band stopped early.
    pub fn wait(handles: Vec<RenderHandle>) -> RenderStatus {
        let mut status = RenderStatus::Completed;
        for handle in handles {
            let thread = handle.thread().name().unwrap_or("render worker").to_string();
            match handle.join() {
                Ok(RenderStatus::Completed) => {}
                Ok(RenderStatus::Cancelled) => status = RenderStatus::Cancelled,
                Err(_) => {
                    log::error!("{}", RenderError::WorkerPanicked { thread });
                    status = RenderStatus::Cancelled;
                }
            }
        }
        status
    }

    /// Ask running workers to stop at their next row boundary.
    pub fn request_render_stop(&self) {
        self.state.cancel.cancel();
    }

    /// True while any worker is still running.
    pub fn is_render_in_progress(&self) -> bool {
        self.state.in_progress.load(Ordering::Acquire) > 0
    }

    /// Fraction of rows finished in the current pass.
    pub fn progress(&self) -> f64 {
        let total = self.state.rows_total.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.state.rows_done.load(Ordering::Relaxed) as f64 / total as f64
    }

    /// Snapshot of the framebuffer's channel values (B, G, R per pixel).
    pub fn get_image(&self) -> Vec<f64> {
        self.state.current().to_vec()
    }

    /// Hold the framebuffer lock while reading, e.g. to export a frame.
    pub fn lock_image(&self) -> ImageGuard<'_> {
        ImageGuard {
            guard: self.state.lock(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_cover_every_row_once() {
        for height in [0, 1, 4, 100, 101] {
            for threads in [1, 2, 3, 4] {
                let bands = scanline_bands(height, threads);
                assert_eq!(bands.len(), threads);

                let mut covered = vec![0u32; height];
                let mut expected_start = 0;
                for band in &bands {
                    assert_eq!(band.start, expected_start, "gap or overlap");
                    expected_start = band.end;
                    for row in band.clone() {
                        covered[row] += 1;
                    }
                }
                assert_eq!(expected_start, height);
                assert!(covered.iter().all(|&c| c == 1));
            }
        }
    }

    #[test]
    fn test_last_band_absorbs_remainder() {
        let bands = scanline_bands(101, 4);
        assert_eq!(bands, vec![0..25, 25..50, 50..75, 75..101]);
        assert_eq!(scanline_bands(10, 0), vec![0..10]);
    }

    #[test]
    fn test_image_coord() {
        assert_eq!(image_coord(0.0, 10), 0.0);
        assert_eq!(image_coord(9.0, 10), 1.0);
        assert_eq!(image_coord(0.0, 1), 0.5);
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::default();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
        clone.reset();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_in_progress_guard_counts() {
        let state = Arc::new(RenderState::default());
        {
            let _a = InProgressGuard::new(Arc::clone(&state));
            let _b = InProgressGuard::new(Arc::clone(&state));
            assert_eq!(state.in_progress.load(Ordering::Acquire), 2);
        }
        assert_eq!(state.in_progress.load(Ordering::Acquire), 0);
    }

    #[test]
    fn test_framebuffer_reallocated_only_on_resize() {
        let state = RenderState::default();
        let first = state.framebuffer(4, 2);
        first.set(0, 0, Color::ONE);

        let same = state.framebuffer(4, 2);
        assert!(Arc::ptr_eq(&first, &same));
        assert_eq!(same.get(0, 0), Color::ONE);

        let resized = state.framebuffer(2, 4);
        assert!(!Arc::ptr_eq(&first, &resized));
        assert_eq!(resized.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "width": 320, "height": 200, "threads": 8 }"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.threads, 8);
        assert_eq!(config.max_depth, RenderConfig::default().max_depth);
    }
}
