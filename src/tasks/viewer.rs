//! Fullscreen window, GPU setup and the per-frame loop around [`AlbumApp`].

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use gilrs::{EventType, Gilrs};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use wgpu::{self, SurfaceError};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Fullscreen, Window, WindowAttributes},
};

use crate::app::AlbumApp;
use crate::assets;
use crate::audio::BackgroundMusic;
use crate::config::Configuration;
use crate::events::{AppRequest, InputEvent};
use crate::input::{CoordinateMapper, map_gamepad, map_key};
use crate::render::Renderer;
use crate::scene::{Frame, TextureKey};
use crate::tasks::loader::FullImageLoader;
use crate::tasks::scan::{ScanHandle, ScanOutcome, ScanRequest, run_scan};

#[derive(Debug)]
enum ViewerEvent {
    Cancelled,
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    renderer: Renderer,
}

struct ViewerApp {
    cfg: Configuration,
    cancel: CancellationToken,
    runtime: Handle,
    album: AlbumApp,
    frame: Frame,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    gilrs: Option<Gilrs>,
    mapper: CoordinateMapper,
    cursor: PhysicalPosition<f64>,
    scan: Option<ScanHandle>,
    pending_scan: Option<ScanOutcome>,
    loader: FullImageLoader,
    fatal: Option<anyhow::Error>,
    _music: Option<BackgroundMusic>,
}

impl ViewerApp {
    fn new(cfg: Configuration, cancel: CancellationToken, runtime: Handle) -> Result<Self> {
        let album = AlbumApp::new(&cfg).context("failed to build album state")?;
        let logical = PhysicalSize::new(cfg.screen.width, cfg.screen.height);
        let loader = FullImageLoader::new(runtime.clone(), cfg.screen.width, cfg.screen.height);
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => {
                for (_, pad) in gilrs.gamepads() {
                    info!(name = pad.name(), "controller found");
                }
                Some(gilrs)
            }
            Err(err) => {
                warn!(error = %err, "controller support unavailable");
                None
            }
        };
        let music = cfg.music.as_deref().and_then(|path| {
            BackgroundMusic::start(path, cfg.music_volume)
                .inspect_err(|err| {
                    warn!(path = %path.display(), error = %err, "background music unavailable")
                })
                .ok()
        });
        Ok(Self {
            cfg,
            cancel,
            runtime,
            album,
            frame: Frame::new(),
            window: None,
            gpu: None,
            gilrs,
            mapper: CoordinateMapper::new(logical, logical),
            cursor: PhysicalPosition::new(0.0, 0.0),
            scan: None,
            pending_scan: None,
            loader,
            fatal: None,
            _music: music,
        })
    }

    fn start_scan(&mut self) {
        let req = ScanRequest {
            root: self.cfg.screenshot_root.clone(),
            pairing: self.cfg.pairing,
            thumbnail_max_px: self.cfg.thumbnail_max_px,
        };
        info!(root = %req.root.display(), background = self.cfg.background_scan, "starting scan");
        if self.cfg.background_scan {
            self.scan = Some(ScanHandle::spawn(&self.runtime, req));
        } else {
            self.pending_scan = Some(run_scan(&req, None));
        }
    }

    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Option<Arc<Window>> {
        if let Some(window) = self.window.as_ref() {
            return Some(window.clone());
        }

        let attrs = WindowAttributes::default()
            .with_title("Photo Album")
            .with_fullscreen(Some(Fullscreen::Borderless(None)));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                self.window = Some(window.clone());
                Some(window)
            }
            Err(err) => {
                error!(error = %err, "failed to create album window");
                None
            }
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> Result<()> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to acquire GPU adapter")?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|fmt| fmt.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("album-device"),
            required_features: wgpu::Features::empty(),
            required_limits: adapter.limits(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
        }))
        .context("failed to acquire GPU device")?;

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        info!(
            width = config.width,
            height = config.height,
            format = ?config.format,
            "album surface configured",
        );
        self.mapper.resize(size);

        let logical = PhysicalSize::new(self.cfg.screen.width, self.cfg.screen.height);
        let mut renderer = Renderer::new(&device, &queue, format, logical, self.cfg.font.as_deref());
        for (asset, image) in assets::load_all(&self.cfg.assets_dir)? {
            renderer.upload(&device, &queue, TextureKey::Asset(asset), &image);
        }

        self.gpu = Some(Gpu {
            surface,
            config,
            device,
            queue,
            renderer,
        });
        Ok(())
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        self.mapper.resize(new_size);
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        gpu.config.width = new_size.width.max(1);
        gpu.config.height = new_size.height.max(1);
        gpu.surface.configure(&gpu.device, &gpu.config);
        debug!(
            width = gpu.config.width,
            height = gpu.config.height,
            "album surface resized",
        );
    }

    /// Pull finished background work into the album and the texture store.
    fn pump_background(&mut self) {
        if let Some(scan) = self.scan.as_mut() {
            self.album.set_scan_progress(scan.found());
            if let Some(outcome) = scan.try_finish() {
                self.pending_scan = Some(outcome);
                self.scan = None;
            }
        }

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if let Some(outcome) = self.pending_scan.take() {
            for (path, image) in &outcome.thumbnails {
                gpu.renderer
                    .upload(&gpu.device, &gpu.queue, TextureKey::Thumb(path.clone()), image);
            }
            self.album.finish_scan(outcome.entries);
        }

        for full in self.loader.drain() {
            match full.image {
                Some(image) => gpu.renderer.upload(
                    &gpu.device,
                    &gpu.queue,
                    TextureKey::Full(full.path),
                    &image,
                ),
                // Missing key draws the black placeholder.
                None => debug!(path = %full.path.display(), "full image unavailable"),
            }
        }

        for request in self.album.drain_requests() {
            match request {
                AppRequest::LoadFull(path) => {
                    if !gpu.renderer.has_texture(&TextureKey::Full(path.clone())) {
                        self.loader.request(path);
                    }
                }
                AppRequest::UnloadFull(path) => {
                    self.loader.discard(&path);
                    gpu.renderer.release_full(&path);
                }
                AppRequest::Release(path) => {
                    self.loader.discard(&path);
                    gpu.renderer.release_path(&path);
                }
            }
        }
    }

    fn poll_gamepads(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };
        while let Some(ev) = gilrs.next_event() {
            let input = match ev.event {
                EventType::ButtonPressed(button, _) => map_gamepad(button).map(InputEvent::ButtonDown),
                EventType::ButtonReleased(button, _) => map_gamepad(button).map(InputEvent::ButtonUp),
                EventType::Connected => {
                    info!(id = %ev.id, "controller connected");
                    None
                }
                EventType::Disconnected => {
                    info!(id = %ev.id, "controller disconnected");
                    None
                }
                _ => None,
            };
            if let Some(input) = input {
                self.album.handle_input(&input);
            }
        }
    }

    fn draw(&mut self, event_loop: &ActiveEventLoop) {
        self.pump_background();
        self.album.update();
        self.album.compose(&mut self.frame);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let surface_frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Outdated | SurfaceError::Lost) => {
                info!("album surface lost; reconfiguring");
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("album surface out of memory; exiting event loop");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::Timeout) => {
                warn!("album surface acquisition timed out");
                return;
            }
            Err(SurfaceError::Other) => {
                warn!("album surface reported an unknown error; retrying");
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
        };

        let view = surface_frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("album-encoder"),
            });
        let size = PhysicalSize::new(gpu.config.width, gpu.config.height);
        gpu.renderer
            .render(&gpu.device, &gpu.queue, &mut encoder, &view, size, &self.frame);
        gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_frame.present();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!(error = ?err, "album viewer failed");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler<ViewerEvent> for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.cancel.is_cancelled() {
            event_loop.exit();
            return;
        }

        let Some(window) = self.ensure_window(event_loop) else {
            self.fail(event_loop, anyhow!("could not create a window"));
            return;
        };

        if self.gpu.is_none() {
            if let Err(err) = self.init_gpu(window.clone()) {
                self.fail(event_loop, err);
                return;
            }
            self.start_scan();
        }

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        let input = match event {
            WindowEvent::CloseRequested => {
                info!("album window close requested");
                event_loop.exit();
                None
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size);
                None
            }
            WindowEvent::RedrawRequested => {
                self.draw(event_loop);
                window.request_redraw();
                None
            }
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                map_key(&event.logical_key).map(|b| match event.state {
                    ElementState::Pressed => InputEvent::ButtonDown(b),
                    ElementState::Released => InputEvent::ButtonUp(b),
                })
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                Some(InputEvent::PointerMotion(self.mapper.to_logical(position)))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let p = self.mapper.to_logical(self.cursor);
                Some(match state {
                    ElementState::Pressed => InputEvent::PointerDown(p),
                    ElementState::Released => InputEvent::PointerUp(p),
                })
            }
            WindowEvent::Touch(touch) => {
                let p = self.mapper.to_logical(touch.location);
                match touch.phase {
                    TouchPhase::Started => Some(InputEvent::PointerDown(p)),
                    TouchPhase::Moved => Some(InputEvent::PointerMotion(p)),
                    TouchPhase::Ended | TouchPhase::Cancelled => Some(InputEvent::PointerUp(p)),
                }
            }
            _ => None,
        };
        if let Some(input) = input {
            self.album.handle_input(&input);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.poll_gamepads();
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::Cancelled => {
                info!("album viewer received cancellation");
                event_loop.exit();
            }
        }
    }
}

/// Run the album until the window closes or `cancel` fires.
///
/// Must be called from within a tokio runtime; decode work is spawned on it.
pub fn run_windowed(cfg: Configuration, cancel: CancellationToken) -> Result<()> {
    let runtime = Handle::try_current().context("album viewer needs a tokio runtime")?;
    let event_loop = EventLoop::<ViewerEvent>::with_user_event()
        .build()
        .context("failed to build album event loop")?;
    let proxy = event_loop.create_proxy();

    let cancel_task = {
        let cancel = cancel.clone();
        runtime.spawn(async move {
            cancel.cancelled().await;
            let _ = proxy.send_event(ViewerEvent::Cancelled);
        })
    };

    let mut app = ViewerApp::new(cfg, cancel, runtime)?;
    let run_result = event_loop.run_app(&mut app);
    cancel_task.abort();

    run_result.context("album event loop failed")?;
    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
