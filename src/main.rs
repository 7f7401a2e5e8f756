//! Bank Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop. In the
//! browser this drives the fixed-step simulation from requestAnimationFrame;
//! natively it runs a headless autopilot game and prints a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use bank_runner::Settings;
    use bank_runner::audio::AudioManager;
    use bank_runner::consts::SIM_DT;
    use bank_runner::platform::web::{self, DomUi, WebShell};
    use bank_runner::platform::{FixedStep, Intent, dispatch};
    use bank_runner::renderer::{CanvasRenderer, SpriteSheets, build_frame};
    use bank_runner::sim::{self, CharacterId, GameState, TickInput, Viewport, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        step: FixedStep,
        last_time: f64,
        renderer: CanvasRenderer,
        sheets: SpriteSheets,
        shell: WebShell,
        settings: Settings,
    }

    impl Game {
        /// Run simulation ticks and deliver their events
        fn update(&mut self, dt: f32) {
            for _ in 0..self.step.advance(dt) {
                tick(&mut self.state, &mut self.input);
            }
            // Button handlers emit between frames too
            dispatch(self.state.drain_events(), &mut self.shell);
        }

        /// Keep the virtual viewport in step with the window aspect
        fn sync_viewport(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (Some(w), Some(h)) = (
                window.inner_width().ok().and_then(|v| v.as_f64()),
                window.inner_height().ok().and_then(|v| v.as_f64()),
            ) else {
                return;
            };
            if h <= 0.0 {
                return;
            }
            let viewport = Viewport::from_aspect((w / h) as f32);
            if viewport != self.state.viewport {
                self.state.resize(viewport);
                self.renderer.resize(&viewport);
            }
        }

        /// Render the current frame
        fn render(&self) {
            let mut list = build_frame(&self.state, &self.sheets);
            if !self.settings.effective_screen_shake() {
                list.translate = Vec2::ZERO;
            }
            self.renderer.render(&list, &self.sheets);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Bank Runner starting...");
        web::notify_host_ready();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let mut state = GameState::new(seed);
        state.touch_controls = settings.touch_controls_enabled(web::is_touch_device());

        let renderer = CanvasRenderer::new(canvas)?;
        renderer.resize(&state.viewport);
        let sheets = SpriteSheets::load(&document)?;
        let shell = WebShell {
            ui: DomUi::new(document.clone()),
            audio: AudioManager::from_settings(&settings),
        };
        update_mute_button(&document, shell.audio.is_muted());

        let game = Rc::new(RefCell::new(Game {
            state,
            input: TickInput::default(),
            step: FixedStep::default(),
            last_time: 0.0,
            renderer,
            sheets,
            shell,
            settings,
        }));
        log::info!("Game initialized with seed: {seed}");

        setup_keyboard(game.clone())?;
        setup_touch(&document, game.clone())?;
        setup_mute_button(&document, game.clone())?;
        setup_buttons(&document, game.clone())?;

        request_animation_frame(game);

        log::info!("Bank Runner running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(intent) = Intent::from_key_code(&event.code()) {
                event.prevent_default();
                intent.apply(&mut game.borrow_mut().input);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_touch(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Tap anywhere that isn't a button jumps
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let on_button = event
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                    .is_some_and(|el| el.tag_name().eq_ignore_ascii_case("button"));
                if !on_button {
                    Intent::Jump.apply(&mut game.borrow_mut().input);
                }
            });
            document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // On-screen buttons
        for (id, intent) in [("btn-jump", Intent::Jump), ("btn-shoot", Intent::Shoot)] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::debug!("No #{id} button");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.stop_propagation();
                intent.apply(&mut game.borrow_mut().input);
            });
            btn.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn update_mute_button(document: &Document, muted: bool) {
        if let Some(btn) = document.get_element_by_id("mute-btn") {
            btn.set_text_content(Some(if muted { "🔇" } else { "🔊" }));
        }
    }

    fn setup_mute_button(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id("mute-btn") else {
            return Ok(());
        };
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.stop_propagation();
            let mut g = game.borrow_mut();
            g.shell.audio.resume();
            let muted = g.shell.audio.toggle_muted();
            update_mute_button(&doc, muted);
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Menu and end-screen buttons, wired to the session operations
    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let actions: [(&str, fn(&mut GameState)); 6] = [
            ("select-dania", |s| sim::select_character(s, CharacterId::Dania)),
            ("select-tatiana", |s| {
                sim::select_character(s, CharacterId::Tatiana)
            }),
            ("restart-level-btn", sim::restart_level),
            ("restart-game-btn", sim::restart_game),
            ("decision-fire-btn", |s| sim::final_decision(s, true)),
            ("decision-stay-btn", |s| sim::final_decision(s, false)),
        ];

        for (id, action) in actions {
            let Some(btn) = document.get_element_by_id(id) else {
                log::debug!("No #{id} button");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                // Browsers only allow audio after a user gesture
                g.shell.audio.resume();
                action(&mut g.state);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {e:?}");
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.sync_viewport();
            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;

    use bank_runner::Settings;
    use bank_runner::consts::FRAMES_PER_SECOND;
    use bank_runner::runner::{RunConfig, run};
    use bank_runner::sim::CharacterId;

    /// Play Bank Runner headless with the autopilot
    #[derive(Parser, Debug)]
    #[command(name = "bank-runner", version, about)]
    struct Args {
        /// Run seed (defaults to settings, then the clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum simulation frames (60 per second)
        #[arg(long, default_value_t = 3 * 60 * FRAMES_PER_SECOND as u64)]
        frames: u64,

        /// Playable character: dania or tatiana
        #[arg(long, default_value = "dania")]
        character: String,

        /// Screen aspect ratio (width / height)
        #[arg(long, default_value_t = 16.0 / 9.0)]
        aspect: f32,

        /// Take the punitive ending instead of resigning
        #[arg(long)]
        fired: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    pub fn main() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let settings = match &args.settings {
            Some(path) => Settings::load_file(path)?,
            None => Settings::default(),
        };

        let character = CharacterId::from_id(&args.character)
            .ok_or_else(|| anyhow!("unknown character '{}'", args.character))?;
        if !(args.aspect.is_finite() && args.aspect > 0.0) {
            return Err(anyhow!("aspect must be a positive number"));
        }

        let seed = match args.seed.or(settings.seed) {
            Some(seed) => seed,
            None => std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .context("system clock before 1970")?
                .as_millis() as u64,
        };

        log::info!("Bank Runner (headless) seed {seed}, {} frames", args.frames);
        let summary = run(&RunConfig {
            seed,
            max_frames: args.frames,
            character,
            aspect: args.aspect,
            fire_everyone: !args.fired,
        });

        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("serializing summary")?
            );
        } else {
            println!("Seed:        {}", summary.seed);
            println!("Character:   {}", summary.character.display_name());
            println!("Frames:      {}", summary.frames_run);
            println!("Phase:       {:?}", summary.final_phase);
            println!("Level:       {}", summary.final_level);
            println!("Hit points:  {}", summary.final_hp);
            println!("Game overs:  {}", summary.game_overs);
            println!("Bosses:      {}", summary.metrics.bosses_defeated);
            println!("Victory:     {}", summary.victory);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
