//! Micro Defender entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, anyhow};
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use micro_defender::renderer::{HudView, RenderState, TextOverlay, UpgradePanel, build_scene};
    use micro_defender::sim::{Command, GamePhase, GameState, InputQueue, Upgrade, tick};
    use micro_defender::{AimMode, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        input: InputQueue,
        /// Canvas size in CSS pixels
        viewport: Vec2,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, viewport: Vec2) -> Self {
            Self {
                state: GameState::new(seed, Tuning::default(), settings, viewport),
                render_state: None,
                input: InputQueue::new(),
                viewport,
            }
        }

        /// One display frame: one simulation step, then draw
        fn frame(&mut self) {
            let input = self.input.drain();
            tick(&mut self.state, &input);

            let scene = build_scene(&self.state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene.vertices, self.viewport) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            update_hud(&scene.hud);
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement, dpr: f64) {
            let css_w = canvas.client_width().max(1);
            let css_h = canvas.client_height().max(1);
            let width = (css_w as f64 * dpr) as u32;
            let height = (css_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            self.viewport = Vec2::new(css_w as f32, css_h as f32);
            self.state.camera.resize(self.viewport.x, self.viewport.y);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
            log::debug!(
                "Resized to {}x{} (zoom {})",
                css_w,
                css_h,
                self.state.camera.zoom
            );
        }

        /// Click or tap at a canvas position: pick an upgrade if the panel is
        /// under it, otherwise aim there and fire
        fn press(&mut self, point: Vec2) {
            if self.state.progression.credits > 0 {
                let panel = UpgradePanel::for_screen(self.viewport);
                if let Some(index) = panel.hit_test(point) {
                    self.input.push(Command::SelectUpgrade(index));
                    return;
                }
            }
            self.input.set_pointer(point);
            self.input.push(Command::Fire);
        }

        /// Drop held keys and pause when the page loses focus
        fn suspend(&mut self, reason: &str) {
            self.input.release_all();
            // Queued after anything already pending, so a resume in the same
            // frame can't leave the game running unfocused
            self.input.push_once(Command::Pause);
            if self.state.phase == GamePhase::Playing {
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    /// Settings from the page URL, e.g. `?aim=facing&speed=normal`
    fn settings_from_query(query: &str) -> Settings {
        let mut settings = Settings::default();
        for pair in query.trim_start_matches('?').split('&') {
            match pair.split_once('=') {
                Some(("aim", value)) => match AimMode::from_str(value) {
                    Some(aim) => settings.aim = aim,
                    None => log::warn!("Unknown aim mode '{}'", value),
                },
                Some(("speed", "normal")) => {
                    settings.game_speed = micro_defender::GameSpeed::Normal;
                }
                _ => {}
            }
        }
        settings
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_overlay(document: &Document, id: &str, overlay: Option<&TextOverlay>) {
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };
        match overlay {
            Some(overlay) => {
                el.set_text_content(Some(&overlay.text));
                let _ = el.set_attribute("style", &format!("opacity: {:.2}", overlay.alpha));
                let _ = el.class_list().toggle_with_force("hidden", false);
            }
            None => {
                let _ = el.class_list().toggle_with_force("hidden", true);
            }
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(hud: &HudView) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        set_text(&document, "hud-score", &format!("Score: {}", hud.score));
        set_text(&document, "hud-level", &format!("Level: {}", hud.level));
        set_text(
            &document,
            "hud-kills",
            &format!("Monsters to next level: {}", hud.kills_to_next),
        );
        set_text(&document, "hud-health", &hud.health);
        set_text(&document, "hud-speed", &format!("Speed: {}", hud.game_speed));
        set_text(
            &document,
            "hud-autofire",
            if hud.auto_fire {
                "Auto-fire: ON"
            } else {
                "Auto-fire: OFF"
            },
        );

        set_overlay(&document, "message", hud.message.as_ref());
        set_overlay(&document, "level-banner", hud.level_banner.as_ref());
        set_overlay(&document, "upgrade-result", hud.upgrade_result.as_ref());

        match &hud.panel {
            Some(panel) => {
                set_hidden(&document, "upgrade-panel", false);
                set_text(
                    &document,
                    "upgrade-credits",
                    &format!("Upgrades: {}", panel.credits),
                );
                set_text(&document, "upgrade-hint", panel.hint);
                for (i, upgrade) in Upgrade::ALL.iter().enumerate() {
                    let id = format!("upgrade-icon-{}", i);
                    set_text(
                        &document,
                        &id,
                        &format!("{} {}", upgrade.icon(), upgrade.hotkey()),
                    );
                    if let Some(el) = document.get_element_by_id(&id) {
                        let tooltip = format!("{}: {}", upgrade.name(), upgrade.description());
                        let _ = el.set_attribute("title", &tooltip);
                    }
                }
            }
            None => set_hidden(&document, "upgrade-panel", true),
        }

        set_hidden(&document, "pause-menu", !hud.paused);
        set_hidden(&document, "game-over", !hud.game_over);
        if hud.game_over {
            set_text(&document, "final-score", &hud.score.to_string());
            set_text(&document, "final-level", &hud.level.to_string());
        }
    }

    pub async fn run() -> anyhow::Result<()> {
        log::info!("Micro Defender starting...");

        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        // Hide loading indicator
        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no canvas element")?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;

        let query = window.location().search().unwrap_or_default();
        let settings = settings_from_query(&query);

        let seed = js_sys::Date::now() as u64;
        let dpr = window.device_pixel_ratio();
        let viewport = Vec2::new(
            canvas.client_width().max(1) as f32,
            canvas.client_height().max(1) as f32,
        );
        let game = Rc::new(RefCell::new(Game::new(seed, settings, viewport)));
        game.borrow_mut().resize(&canvas, dpr);
        log::info!("Game initialized with seed: {} ({:?})", seed, settings);

        // Initialize WebGPU, falling back to WebGL2
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to get adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_resize(&canvas, game.clone())?;
        setup_auto_pause(game.clone())?;

        set_hidden(&document, "hud", false);

        request_animation_frame(game);

        log::info!("Micro Defender running!");
        Ok(())
    }

    /// Touch position relative to the canvas
    fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(Vec2::new(
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> anyhow::Result<()> {
        let window = web_sys::window().context("no window")?;

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - aim
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().input.set_pointer(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - upgrade panel or fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().press(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - same as a click
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = touch_point(&canvas_clone, &event) {
                    game.borrow_mut().press(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - aim
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = touch_point(&canvas_clone, &event) {
                    game.borrow_mut().input.set_pointer(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - stop aiming
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.clear_pointer();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> anyhow::Result<()> {
        let window = web_sys::window().context("no window")?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            game.borrow_mut().resize(&canvas, dpr);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> anyhow::Result<()> {
        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().suspend("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().suspend("window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("no window; stopping game loop");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    if let Err(e) = wasm_game::run().await {
        log::error!("Micro Defender failed to start: {:#}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: a scripted player on a fixed seed, for balance checks
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use micro_defender::sim::{GameState, HeldKeys, TickInput, tick};

    /// Ten minutes of play; the demo stops here even if the player survives
    pub const FRAME_LIMIT: u64 = micro_defender::consts::FRAMES_PER_SECOND as u64 * 60 * 10;

    #[derive(Debug)]
    pub struct Summary {
        pub frames: u64,
        pub score: u64,
        pub level: u32,
        pub enemies_alive: usize,
        pub survived: bool,
    }

    /// Circle the arena, aim at the nearest enemy and spend credits as they come
    fn bot_input(state: &GameState) -> TickInput {
        let mut input = TickInput::idle();
        input.held = match (state.frame / 90) % 4 {
            0 => HeldKeys {
                right: true,
                ..HeldKeys::default()
            },
            1 => HeldKeys {
                down: true,
                ..HeldKeys::default()
            },
            2 => HeldKeys {
                left: true,
                ..HeldKeys::default()
            },
            _ => HeldKeys {
                up: true,
                ..HeldKeys::default()
            },
        };

        let center = state.player.center();
        input.pointer = state
            .enemies
            .iter()
            .min_by(|a, b| {
                let da = a.center().distance_squared(center);
                let db = b.center().distance_squared(center);
                da.total_cmp(&db)
            })
            .map(|enemy| state.camera.world_to_screen(enemy.center()));

        if state.progression.credits > 0 {
            let index = state.progression.level as usize % 4;
            input = input.with_command(micro_defender::sim::Command::SelectUpgrade(index));
        }
        input
    }

    pub fn run(state: &mut GameState) -> Summary {
        while !state.is_over() && state.frame < FRAME_LIMIT {
            let input = bot_input(state);
            let level = state.progression.level;
            tick(state, &input);
            if state.progression.level != level && state.progression.level % 5 == 0 {
                log::info!(
                    "frame {}: level {} score {} health {:.0}/{:.0}",
                    state.frame,
                    state.progression.level,
                    state.score,
                    state.player.health,
                    state.player.max_health
                );
            }
        }

        Summary {
            frames: state.frame,
            score: state.score,
            level: state.progression.level,
            enemies_alive: state.enemies.len(),
            survived: !state.is_over(),
        }
    }

    pub fn viewport() -> Vec2 {
        Vec2::new(
            micro_defender::consts::DEFAULT_VIEWPORT_WIDTH,
            micro_defender::consts::DEFAULT_VIEWPORT_HEIGHT,
        )
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use micro_defender::sim::GameState;
    use micro_defender::{Settings, Tuning};

    env_logger::init();
    log::info!("Micro Defender (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    // Usage: micro-defender [tuning.json] [seed]
    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read tuning file {}", path))?;
            Tuning::from_json(&json).with_context(|| format!("invalid tuning in {}", path))?
        }
        None => Tuning::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("seed must be an integer, got '{}'", raw))?,
        None => 42,
    };

    let mut state = GameState::new(seed, tuning, Settings::default(), headless::viewport());
    let summary = headless::run(&mut state);
    log::info!("Demo finished: {:?}", summary);

    println!(
        "seed {}: {} after {} frames - level {}, score {}, {} enemies alive",
        seed,
        if summary.survived { "survived" } else { "died" },
        summary.frames,
        summary.level,
        summary.score,
        summary.enemies_alive
    );
    Ok(())
}
