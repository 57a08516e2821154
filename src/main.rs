//! Roll-a-Ball entry point
//!
//! Native builds run a headless demo of a level; the browser build drives the
//! game from requestAnimationFrame with Web Audio and DOM text for the HUD.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Roll-a-Ball starting...");

    if let Err(e) = web::start() {
        log::error!("Failed to start: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Roll-a-Ball (native, headless) starting...");

    if let Err(e) = demo::run(std::env::args().nth(1)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;
    use wasm_bindgen::prelude::*;

    use roll_a_ball::audio::WebAudioSink;
    use roll_a_ball::consts::SIM_DT;
    use roll_a_ball::input::{Controls, Key};
    use roll_a_ball::sim::LevelDesc;
    use roll_a_ball::ui::Hud;
    use roll_a_ball::{Game, GameError, Settings};

    /// Gameplay, victory and level select
    const PAGE_COUNT: usize = 3;

    struct App {
        game: Game,
        controls: Controls,
        hud: Rc<RefCell<Hud>>,
        last_time: f64,
    }

    pub fn start() -> Result<(), GameError> {
        let settings = Settings::load();
        let controls = Controls::from_settings(&settings);
        let hud = Rc::new(RefCell::new(Hud::new(PAGE_COUNT)));
        let game = Game::builder()
            .settings(settings)
            .level(LevelDesc::demo())
            .ui(Box::new(hud.clone()))
            .audio(Box::new(WebAudioSink::new()))
            .build()?;
        log::info!(
            "Ready: {} level(s), {} controls",
            game.level_count(),
            if controls.uses_tilt() { "tilt" } else { "keyboard" }
        );

        let app = Rc::new(RefCell::new(App {
            game,
            controls,
            hud,
            last_time: 0.0,
        }));
        setup_input_handlers(app.clone());
        request_animation_frame(app);
        Ok(())
    }

    fn key_for(code: &str) -> Option<Key> {
        match code {
            "ArrowUp" | "KeyW" => Some(Key::Up),
            "ArrowDown" | "KeyS" => Some(Key::Down),
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Space" => Some(Key::Jump),
            "KeyR" => Some(Key::Restart),
            _ => None,
        }
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; input disabled");
            return;
        };

        // Keyboard
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(key) = key_for(&event.code()) {
                    event.prevent_default();
                    app.borrow_mut().controls.set_key(key, pressed);
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Device tilt
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::DeviceMotionEvent| {
                if let Some(a) = event.acceleration_including_gravity() {
                    let raw = Vec3::new(
                        a.x().unwrap_or(0.0) as f32,
                        a.y().unwrap_or(0.0) as f32,
                        a.z().unwrap_or(0.0) as f32,
                    );
                    app.borrow_mut().controls.set_acceleration(raw);
                }
            });
            let _ = window
                .add_event_listener_with_callback("devicemotion", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Screen tap jumps in tilt mode
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().controls.tap();
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
            let mut guard = app.borrow_mut();
            let a = &mut *guard;

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.game.advance(dt, &mut a.controls);
            render_hud(&a.hud.borrow());
        }

        request_animation_frame(app);
    }

    /// Mirror the HUD into the page; CSS switches pages on `data-page`
    fn render_hud(hud: &Hud) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let texts = [
            ("hud-score", &hud.score_text),
            ("hud-time", &hud.time_text),
            ("victory-score", &hud.victory_score_text),
            ("victory-time", &hud.victory_time_text),
        ];
        for (id, text) in texts {
            if let Some(el) = document.get_element_by_id(id) {
                el.set_text_content(Some(text.as_str()));
            }
        }

        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("data-page", &hud.pages.current().to_string());
            let _ = root.set_attribute("data-status", if hud.status_visible { "on" } else { "off" });
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;
    use roll_a_ball::audio::{Cue, MemoryAudio};
    use roll_a_ball::input::{Controls, Key};
    use roll_a_ball::sim::{LevelDesc, RunState};
    use roll_a_ball::ui::Hud;
    use roll_a_ball::{Game, GameError, Settings};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_SECONDS: f32 = 10.0;

    /// Roll the ball forward until the level is won or time runs out
    pub fn run(level_path: Option<String>) -> Result<(), GameError> {
        let level = match level_path {
            Some(path) => {
                let json = std::fs::read_to_string(&path).map_err(roll_a_ball::ConfigError::from)?;
                LevelDesc::from_json(&json)?
            }
            None => LevelDesc::demo(),
        };

        let settings = Settings::load();
        let mut input = Controls::from_settings(&settings);
        // Hold "forward" in whichever scheme is configured
        input.set_key(Key::Up, true);
        input.set_acceleration(Vec3::new(0.0, 0.5, -0.866));

        let hud = Rc::new(RefCell::new(Hud::new(3)));
        let (sink, audio_log) = MemoryAudio::new();
        let mut game = Game::builder()
            .settings(settings)
            .level(level)
            .ui(Box::new(hud.clone()))
            .audio(Box::new(sink))
            .build()?;

        let mut t = 0.0;
        while t < MAX_SECONDS && game.state().player.run_state == RunState::Playing {
            game.advance(FRAME_DT, &mut input);
            t += FRAME_DT;
        }

        let hud = hud.borrow();
        let audio = audio_log.borrow();
        println!("Level:     {}", game.state().level.name);
        println!("Controls:  {}", if input.uses_tilt() { "tilt" } else { "keyboard" });
        println!("Outcome:   {:?}", game.state().player.run_state);
        println!("Score:     {}", hud.score_text);
        println!("Timer:     {}", hud.time_text);
        println!("Unlocked:  level {}", game.session().unlocked_level());
        println!(
            "Audio:     rolling x{}, impacts x{}, pickups x{}",
            audio.starts(Cue::Rolling),
            audio.starts(Cue::Impact),
            audio.starts(Cue::Pickup)
        );
        Ok(())
    }
}
