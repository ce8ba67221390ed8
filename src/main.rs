use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use snowfield::cli::Cli;
use snowfield::core::{SkyRenderer, WinitController};
use snowfield::frame::FrameIterator;
use snowfield::loaders::{load_scene_textures, GltfModelLoader};
use snowfield::renderer::RecordingRenderer;
use snowfield::traits::{Button, Renderer};
use snowfield::{InputState, SceneConfig, SceneState, Viewport};

const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Hand the renderer everything that stays resident for the whole run
fn prepare_renderer(renderer: &mut dyn Renderer, scene: &SceneState, config: &SceneConfig) -> Result<()> {
    renderer.register_terrain(&scene.terrain_mesh())?;
    for (slot, texture) in load_scene_textures(&config.assets) {
        renderer.register_texture(slot, &texture)?;
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SceneConfig> {
    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path).with_context(|| format!("Failed to load config {:?}", path))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.terrain.seed = seed;
    }
    if let Some(model) = &cli.model {
        config.assets.model = Some(model.clone());
    }
    Ok(config)
}

/// Forward until something blocks the way, then turn left
fn autowalk_input(blocked: bool) -> InputState {
    InputState {
        forward: true,
        turn_left: blocked,
        ..Default::default()
    }
}

fn run_headless(cli: &Cli, config: &SceneConfig) -> Result<()> {
    let mut models = GltfModelLoader::new();
    let mut scene = SceneState::init(config, &mut models).context("Failed to initialize scene")?;

    let mut renderer = RecordingRenderer::new();
    prepare_renderer(&mut renderer, &scene, config)?;
    renderer.resize(config.window.width, config.window.height);
    let viewport = Viewport::new(config.window.width, config.window.height);

    let mut blocked = false;
    let mut total_steps = 0u64;
    let mut total_blocked = 0u64;

    for frame in FrameIterator::fixed(cli.dt).take(cli.frames as usize) {
        let input = if cli.autowalk { autowalk_input(blocked) } else { InputState::default() };
        let report = scene.tick(frame.delta, input);
        blocked = report.blocked > 0;
        total_steps += u64::from(report.steps);
        total_blocked += u64::from(report.blocked);
        if let Some(color) = report.clear_color {
            debug!("frame {}: clear color {:?}", frame.number, color.to_array());
        }

        renderer.render(&scene.draw(&viewport, &models))?;
    }

    let cam = scene.camera();
    let stats = renderer.last_stats();
    println!(
        "{} frames: camera ({:.1}, {:.1}) heading {:.2}, {} steps, {} blocked",
        renderer.frames(),
        cam.x,
        cam.z,
        cam.theta,
        total_steps,
        total_blocked
    );
    println!(
        "day cycle: {} laps, phase {:?}, snow {}, last frame {} draws",
        scene.day_cycle().lap_count(),
        scene.day_cycle().phase(),
        if scene.snow().is_active() { "falling" } else { "off" },
        stats.commands
    );

    scene.shutdown(&mut models);
    Ok(())
}

struct App {
    config: SceneConfig,
    scene: Option<SceneState>,
    models: GltfModelLoader,
    input: WinitController,
    window: Option<Arc<Window>>,
    renderer: Option<SkyRenderer>,
    frames: FrameIterator,
    frame_count: u32,
    fps: f32,
    fps_update_timer: f32,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig) -> Result<Self> {
        let mut models = GltfModelLoader::new();
        let scene = SceneState::init(&config, &mut models).context("Failed to initialize scene")?;

        Ok(Self {
            config,
            scene: Some(scene),
            models,
            input: WinitController::new(),
            window: None,
            renderer: None,
            frames: FrameIterator::new(),
            frame_count: 0,
            fps: 0.0,
            fps_update_timer: 0.0,
            failure: None,
        })
    }

    fn update_fps(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            println!("FPS: {:.1}", self.fps);
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.failure = Some(err);
        event_loop.exit();
    }

    fn create_renderer(&self, window: Arc<Window>) -> Result<SkyRenderer> {
        let mut renderer =
            SkyRenderer::new(window).map_err(|e| anyhow::anyhow!("Failed to initialize renderer: {}", e))?;
        if let Some(scene) = &self.scene {
            prepare_renderer(&mut renderer, scene, &self.config)?;
        }
        Ok(renderer)
    }

    fn redraw(&mut self) {
        let Some(frame) = self.frames.next() else {
            return;
        };
        self.update_fps(frame.delta);

        let (Some(scene), Some(renderer)) = (&mut self.scene, &mut self.renderer) else {
            return;
        };

        let report = scene.tick(frame.delta, InputState::from_controller(&self.input));
        if let Some(color) = report.clear_color {
            debug!("clear color now {:?}", color.to_array());
        }

        let (width, height) = renderer.dimensions();
        let viewport = Viewport {
            width,
            height,
            cursor_y: self.input.mouse_position().map(|(_, y)| y),
        };
        let plan = scene.draw(&viewport, &self.models);
        if let Err(e) = renderer.render(&plan) {
            error!("Render error: {:#}", e);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.window.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => return self.fail(event_loop, anyhow::anyhow!("Failed to create window: {}", e)),
        };

        match self.create_renderer(window.clone()) {
            Ok(renderer) => {
                self.window = Some(window);
                self.renderer = Some(renderer);
                // Window and GPU setup must not show up as the first frame's delta
                self.frames.restart();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(button) = self.input.process_event(&event) {
            match button {
                Button::Escape | Button::KeyQ => event_loop.exit(),
                other => {
                    if let Some(scene) = &mut self.scene {
                        scene.toggle(other);
                    }
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(scene) = self.scene.take() {
            scene.shutdown(&mut self.models);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.headless {
        info!("running {} headless frames at dt {}", cli.frames, cli.dt);
        return run_headless(&cli, &config);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;

    println!("Snowfield - Controls: arrows to walk, W/F/M/A toggle display, Escape or Q to quit");
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
