//! Informatics Racer entry point
//!
//! Browser: renders into `#canvas`, keeps the HUD and overlays in the DOM.
//! Native: runs the autopilot headless and logs how far it got.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent};

    use informatics_racer::Settings;
    use informatics_racer::audio::AudioManager;
    use informatics_racer::consts::*;
    use informatics_racer::renderer::{RenderState, scene};
    use informatics_racer::sim::{GamePhase, GameState, LEVELS, QuizBank, TickInput, tick, validate_levels};
    use informatics_racer::sound::{MusicSequencer, SoundEffect};
    use informatics_racer::ui::{ButtonAction, Hud, Overlay, OverlayTracker};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: AudioManager,
        music: MusicSequencer,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        overlay: OverlayTracker,
    }

    impl Game {
        fn new(state: GameState, settings: Settings) -> Self {
            Self {
                state,
                audio: AudioManager::new(&settings),
                music: MusicSequencer::new(),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput {
                    autopilot: settings.autopilot,
                    ..Default::default()
                },
                overlay: OverlayTracker::default(),
                settings,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot inputs are consumed by the first tick that sees them
                self.input.confirm = false;
                self.input.answer = None;
            }

            for event in self.state.drain_events() {
                log::debug!("Event: {:?}", event);
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }

            if self.state.phase == GamePhase::Playing && self.settings.music {
                let notes = self.music.advance(dt);
                self.audio.play_music(&notes);
            } else {
                self.music.reset();
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let vertices = scene::build(&self.state, time / 1000.0);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let hud = Hud::for_state(&self.state);
            if let Some(el) = document.get_element_by_id("hud") {
                let _ = el.set_attribute("class", if hud.is_some() { "" } else { "hidden" });
            }
            let Some(hud) = hud else { return };

            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.lives_text()));
            }
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.level.to_string()));
            }
        }

        /// Overlay to show if it changed since the last frame
        fn take_overlay_change(&mut self) -> Option<Option<Overlay>> {
            let change = self.overlay.take_change(&self.state)?;
            log::info!("Overlay for {:?}", self.state.phase);
            Some(change)
        }

        /// Feed an overlay button press into the next tick
        fn press(&mut self, action: ButtonAction) {
            self.audio.resume();
            self.audio.play(SoundEffect::ButtonClick);
            match action {
                ButtonAction::Confirm => self.input.confirm = true,
                ButtonAction::Answer(i) => self.input.answer = Some(i),
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Informatics Racer starting...");

        let settings = Settings::load();
        let quiz = QuizBank::builtin().map_err(|e| JsValue::from_str(&e.to_string()))?;
        validate_levels(&LEVELS).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let state = GameState::new(seed, quiz).with_start_level(settings.start_level);
        let game = Rc::new(RefCell::new(Game::new(state, settings)));

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        // Without a GPU the game still runs; only the road is missing
        match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                match RenderState::new(surface, &adapter, width, height).await {
                    Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                    Err(e) => log::error!("Renderer setup failed: {}", e),
                }
            }
            Err(e) => log::error!("No graphics adapter: {}", e),
        }

        setup_input_handlers(game.clone())?;

        request_animation_frame(game);

        log::info!("Informatics Racer running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    " " | "Enter" => g.input.confirm = true,
                    key @ ("1" | "2" | "3" | "4") => {
                        if g.state.phase == GamePhase::Quiz {
                            g.input.answer = key.parse::<usize>().ok().map(|n| n - 1);
                        }
                    }
                    "i" | "I" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    "m" | "M" => {
                        let muted = !g.audio.is_muted();
                        g.audio.set_muted(muted);
                        log::info!("Muted: {}", muted);
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Replace the overlay contents, or hide it
    fn show_overlay(game: &Rc<RefCell<Game>>, document: &Document, overlay: Option<Overlay>) {
        let Some(root) = document.get_element_by_id("overlay") else { return };
        root.set_inner_html("");

        let Some(overlay) = overlay else {
            let _ = root.set_attribute("class", "hidden");
            return;
        };
        let _ = root.set_attribute("class", "");

        if let Err(e) = fill_overlay(game, document, &root, &overlay) {
            log::warn!("Failed to build overlay: {:?}", e);
        }
    }

    fn fill_overlay(
        game: &Rc<RefCell<Game>>,
        document: &Document,
        root: &Element,
        overlay: &Overlay,
    ) -> Result<(), JsValue> {
        let heading = document.create_element("h2")?;
        heading.set_class_name(overlay.accent.css_class());
        heading.set_text_content(Some(&overlay.heading));
        root.append_child(&heading)?;

        for line in &overlay.lines {
            let p = document.create_element("p")?;
            p.set_text_content(Some(line));
            root.append_child(&p)?;
        }

        let buttons = document.create_element("div")?;
        buttons.set_class_name(if overlay.buttons.len() > 1 { "options" } else { "actions" });
        for button in &overlay.buttons {
            let el = document.create_element("button")?;
            el.set_text_content(Some(&button.label));

            let game = game.clone();
            let action = button.action;
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().press(action);
            });
            el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();

            buttons.append_child(&el)?;
        }
        root.append_child(&buttons)?;

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let document = web_sys::window().and_then(|w| w.document());

        let overlay_change = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
            if let Some(ref document) = document {
                g.update_hud(document);
            }
            g.take_overlay_change()
        };

        // Button closures borrow the game later, so build outside the borrow
        if let (Some(overlay), Some(document)) = (overlay_change, document) {
            show_overlay(&game, &document, overlay);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use informatics_racer::consts::SIM_DT;
    use informatics_racer::sim::{
        GameEvent, GamePhase, GameState, LEVELS, QuizBank, TickInput, tick, validate_levels,
    };
    use informatics_racer::{ContentError, Settings};

    /// Longest demo run, in simulated seconds
    const MAX_SECS: f32 = 600.0;

    #[derive(Debug, Default)]
    struct Tally {
        coins: u32,
        crashes: u32,
        quizzes: u32,
        levels_cleared: u32,
    }

    pub fn run(settings: &Settings) -> Result<(), ContentError> {
        validate_levels(&LEVELS)?;
        let quiz = QuizBank::builtin()?;
        log::info!("Loaded {} quiz questions", quiz.len());

        let seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        let mut state = GameState::new(seed, quiz).with_start_level(settings.start_level);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        log::info!("Headless autopilot run, seed {}", seed);

        let mut tally = Tally::default();
        let max_ticks = (MAX_SECS / SIM_DT) as u64;
        for _ in 0..max_ticks {
            tick(&mut state, &input, SIM_DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::CoinCollected => tally.coins += 1,
                    GameEvent::Crash => tally.crashes += 1,
                    GameEvent::MysteryBoxOpened => tally.quizzes += 1,
                    GameEvent::LevelComplete(_) | GameEvent::GameWon => tally.levels_cleared += 1,
                    _ => {}
                }
            }
            if matches!(state.phase, GamePhase::GameOver | GamePhase::GameWon) {
                break;
            }
        }

        log::info!(
            "Finished in {:?} after {:.1}s: level {}, score {}, lives {}, {:?}",
            state.phase,
            state.time_ticks as f32 * SIM_DT,
            state.level,
            state.score,
            state.lives,
            tally
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Informatics Racer (native) starting...");
    log::info!("Native mode runs the autopilot only - use `trunk serve` to play in the browser");

    let settings = informatics_racer::Settings::load();
    if let Err(e) = headless::run(&settings) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
