//! Basket Catch entry point
//!
//! The browser build wires the game to the DOM and runs it from
//! requestAnimationFrame. The native build plays one headless run on
//! autopilot and keeps its high scores on disk.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, FocusEvent, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use basket_catch::audio::AudioManager;
    use basket_catch::consts::*;
    use basket_catch::game::{Collaborators, Game};
    use basket_catch::persistence::LocalStore;
    use basket_catch::platform::KeyboardState;
    use basket_catch::platform::web::{
        CanvasRenderer, DomOverlay, DomScoreBoard, DomStats, document,
    };

    /// Frame length assumed before the first timestamp arrives
    const FIRST_FRAME_MS: f32 = 1000.0 / 60.0;

    struct App {
        game: Game,
        renderer: Option<CanvasRenderer>,
        keys: KeyboardState,
        audio: AudioManager,
        last_time: f64,
    }

    impl App {
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) as f32).min(MAX_FRAME_MS)
            } else {
                FIRST_FRAME_MS
            };
            self.last_time = time;

            let input = self.keys.take_tick_input();
            self.game.frame(dt, &input);
        }

        fn render(&mut self) {
            if let Some(renderer) = self.renderer.as_mut() {
                self.game.render(renderer);
            }
        }
    }

    fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }

        log::info!("Basket Catch starting...");

        let Some(document) = document() else {
            log::error!("No document - nothing to run in");
            return;
        };

        let canvas = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        let renderer = canvas.as_ref().and_then(|canvas| {
            canvas.set_tab_index(1);
            CanvasRenderer::new(canvas, FIELD_WIDTH as u32, FIELD_HEIGHT as u32)
        });
        if renderer.is_none() {
            log::warn!("No 2D canvas found - running without graphics");
        }

        let audio = AudioManager::new(1.0);
        let platform = Collaborators {
            audio: Box::new(audio.clone()),
            stats: Box::new(DomStats::new(&document)),
            overlay: Box::new(DomOverlay::new(&document)),
            scoreboard: Box::new(DomScoreBoard::new(&document)),
            store: Box::new(LocalStore::new()),
        };

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, platform),
            renderer,
            keys: KeyboardState::new(),
            audio,
            last_time: 0.0,
        }));

        setup_keyboard(app.clone());
        setup_buttons(&document, app.clone());
        setup_auto_pause(app.clone());

        request_animation_frame(app);

        log::info!("Basket Catch running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            listen(&window, "keydown", move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if a.keys.key_down(&event.key()) {
                    event.prevent_default();
                    a.audio.resume();
                }
            });
        }

        listen(&window, "keyup", move |event: KeyboardEvent| {
            app.borrow_mut().keys.key_up(&event.key());
        });
    }

    fn setup_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        let actions: [(&str, fn(&mut Game)); 4] = [
            ("startBtn", Game::start),
            ("pauseBtn", Game::pause),
            ("resumeBtn", Game::resume),
            ("restartBtn", Game::restart),
        ];

        for (id, action) in actions {
            let Some(btn) = document.get_element_by_id(id) else {
                log::debug!("No #{} button", id);
                continue;
            };
            let app = app.clone();
            listen(&btn, "click", move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.keys.release_all();
                action(&mut a.game);
            });
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        listen(&window, "blur", move |_event: FocusEvent| {
            let mut a = app.borrow_mut();
            // Key-up events are lost while unfocused
            a.keys.release_all();
            if a.game.settings().pause_on_blur && a.game.state().is_playing() {
                a.game.pause();
                log::info!("Auto-paused (window blur)");
            }
        });
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use basket_catch::game::{Collaborators, Game};
    use basket_catch::persistence::FileStore;
    use basket_catch::sim::{GamePhase, demo_input};
    use basket_catch::{QualityPreset, Settings};

    const DEFAULT_SEED: u64 = 42;
    const SAVE_DIR: &str = ".basket-catch";
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Ten minutes of play at 60 FPS
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// `basket-catch [seed] [low|medium|high]`
    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|arg| arg.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let preset = args.next().and_then(|arg| QualityPreset::from_str(&arg));

        let store = FileStore::new(SAVE_DIR);
        let mut game = Game::new(seed, Collaborators::headless(Box::new(store)));
        if let Some(quality) = preset {
            game.update_settings(Settings {
                quality,
                ..game.settings().clone()
            });
        }
        game.start();

        let mut frames = 0;
        while game.phase() == GamePhase::Playing && frames < MAX_FRAMES {
            let input = demo_input(game.state());
            game.frame(FRAME_MS, &input);
            frames += 1;
        }

        let seed = game.state().seed;
        match game.last_result() {
            Some(result) => log::info!(
                "Seed {} run over after {} frames: {} points ({})",
                seed,
                frames,
                result.final_score,
                result.banner.message()
            ),
            None => log::info!(
                "Seed {} stopped after {} frames at {} points, level {}",
                seed,
                frames,
                game.state().stats.score,
                game.state().stats.level
            ),
        }
        log::info!("Best score: {}", game.high_scores().top_score());
        for line in game.high_scores().display_lines() {
            log::info!("  {}", line);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Basket Catch (headless autopilot) starting...");
    headless::run();
}
