//! Bounce Canvas entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_demo {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use bounce_canvas::SceneConfig;
    use bounce_canvas::driver::{AnimationFrameScheduler, AnimationLoop, LoopControl, Scheduler};
    use bounce_canvas::renderer::{FrameBuilder, RenderState, draw_world};
    use bounce_canvas::sim::{Obstacle, World};

    /// Demo instance holding all state
    struct Demo {
        world: World,
        obstacles: Vec<Obstacle>,
        frame: FrameBuilder,
        animation: AnimationLoop,
        render_state: Option<RenderState>,
    }

    impl Demo {
        /// One display refresh: tick the world, then redraw
        fn refresh(&mut self, time: f64) -> LoopControl {
            let Demo {
                world,
                obstacles,
                frame,
                animation,
                render_state,
            } = self;

            animation.frame(time, |_time_step| {
                *world = world.update(obstacles);
                draw_world(frame, world, obstacles);

                if let Some(render_state) = render_state {
                    match render_state.render(frame) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            render_state.resize(render_state.size.0, render_state.size.1);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of memory!");
                            return LoopControl::Stop;
                        }
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
                LoopControl::Continue
            })
        }
    }

    /// Find the page's canvas, or append a fresh one to the body
    fn canvas(document: &web_sys::Document) -> Option<HtmlCanvasElement> {
        if let Some(el) = document.get_element_by_id("canvas") {
            return el.dyn_into().ok();
        }
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        canvas.set_id("canvas");
        document.body()?.append_child(&canvas).ok()?;
        Some(canvas)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bounce Canvas starting...");

        let (world, obstacles) = match SceneConfig::default().build() {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("Invalid scene: {e}");
                return;
            }
        };

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let Some(canvas) = canvas(&document) else {
            log::error!("No canvas available");
            return;
        };

        let width = world.bounds.width as u32;
        let height = world.bounds.height as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {e}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {e}");
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = match RenderState::new(surface, &adapter, width, height).await {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to create device: {e}");
                return;
            }
        };

        let demo = Rc::new(RefCell::new(Demo {
            frame: FrameBuilder::new(world.bounds),
            world,
            obstacles,
            animation: AnimationLoop::new(),
            render_state: Some(render_state),
        }));

        AnimationFrameScheduler.run(move |time| demo.borrow_mut().refresh(time));

        log::info!("Bounce Canvas running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_demo::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use anyhow::Context as _;
    use clap::Parser;

    use bounce_canvas::SceneConfig;
    use bounce_canvas::consts::MAX_SCATTER_BALLS;
    use bounce_canvas::driver::{AnimationLoop, HeadlessScheduler, LoopControl, Scheduler};
    use bounce_canvas::renderer::{FrameBuilder, draw_world};
    use bounce_canvas::settings::DisplayConfig;
    use bounce_canvas::sim::{Obstacle, World};

    #[derive(Parser, Debug)]
    #[command(name = "bounce-canvas", version, about = "Run the bouncing-ball simulation headless")]
    struct Cli {
        /// Scene JSON (defaults to the built-in demo scene)
        #[arg(long, conflicts_with_all = ["scatter", "two_ball"])]
        scene: Option<PathBuf>,

        /// Scatter this many random balls on an empty display
        #[arg(
            long,
            conflicts_with = "two_ball",
            value_parser = clap::value_parser!(u64).range(1..=MAX_SCATTER_BALLS)
        )]
        scatter: Option<u64>,

        /// Seed for --scatter
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Use the demo scene with a second ball
        #[arg(long)]
        two_ball: bool,

        /// Number of ticks to simulate
        #[arg(long, default_value_t = 600)]
        frames: u64,

        /// Simulated display refresh rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Print the final world as JSON
        #[arg(long)]
        dump: bool,
    }

    struct Demo {
        world: World,
        obstacles: Vec<Obstacle>,
        frame: FrameBuilder,
        animation: AnimationLoop,
        contacts: usize,
        vertices: usize,
    }

    fn scene(cli: &Cli) -> anyhow::Result<SceneConfig> {
        Ok(if let Some(path) = &cli.scene {
            SceneConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        } else if let Some(count) = cli.scatter {
            let count = usize::try_from(count).context("--scatter count")?;
            SceneConfig::scatter(cli.seed, count, DisplayConfig::default())
        } else if cli.two_ball {
            SceneConfig::two_ball()
        } else {
            SceneConfig::default()
        })
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::init();
        let cli = Cli::parse();
        log::info!("Bounce Canvas (native) starting...");

        let (world, obstacles) = scene(&cli)?.build().context("invalid scene")?;
        log::info!(
            "Scene: {}x{} display, {} actors, {} obstacles",
            world.bounds.width,
            world.bounds.height,
            world.actors().len(),
            obstacles.len()
        );

        let demo = Rc::new(RefCell::new(Demo {
            frame: FrameBuilder::new(world.bounds),
            world,
            obstacles,
            animation: AnimationLoop::new(),
            contacts: 0,
            vertices: 0,
        }));

        // The first refresh only primes the clock
        let mut scheduler = HeadlessScheduler::new(cli.fps, Some(cli.frames + 1));
        let shared = demo.clone();
        scheduler.run(move |time| {
            let mut demo = shared.borrow_mut();
            let Demo {
                world,
                obstacles,
                frame,
                animation,
                contacts,
                vertices,
            } = &mut *demo;

            animation.frame(time, |_time_step| {
                *world = world.update(obstacles);
                *contacts += world.contacts().len();
                draw_world(frame, world, obstacles);
                *vertices = frame.vertices().len();
                LoopControl::Continue
            })
        });

        let demo = demo.borrow();
        log::info!(
            "Ran {} ticks: {} obstacle contacts, {} vertices in the last frame",
            demo.world.tick().0,
            demo.contacts,
            demo.vertices
        );
        for actor in demo.world.actors() {
            log::info!(
                "actor {} at ({:.1}, {:.1}) moving ({:.2}, {:.2})",
                actor.id,
                actor.position.x,
                actor.position.y,
                actor.velocity.x,
                actor.velocity.y
            );
        }

        if cli.dump {
            println!("{}", serde_json::to_string_pretty(&demo.world)?);
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
