//! Wave Survivor entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement};

    use wave_survivor::highscores::LocalStorageStore;
    use wave_survivor::input::{KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_UP};
    use wave_survivor::renderer::{self, CanvasRenderer};
    use wave_survivor::sim::GameEvent;
    use wave_survivor::ui::{SLOT_ATTR, UPGRADE_OPTIONS_ID};
    use wave_survivor::{Game, GameMode, Settings, ui};

    /// How long the shake class stays on the canvas
    const SHAKE_MS: i32 = 200;

    /// Browser-side state around the game
    struct App {
        game: Game<LocalStorageStore>,
        renderer: Option<CanvasRenderer>,
        /// An animation frame is scheduled
        loop_active: bool,
        /// Mode the DOM panels were last synced to
        shown_mode: Option<GameMode>,
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Wave Survivor starting...");

        let Some(document) = document() else {
            log::warn!("No document, nothing to run");
            return;
        };

        let canvas = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        let renderer = canvas.as_ref().and_then(CanvasRenderer::new);
        if renderer.is_none() {
            log::warn!("Canvas 2D context unavailable, drawing disabled");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(Settings::load(), LocalStorageStore, seed);
        set_text(&document, "highScore", &ui::high_score_line(game.high_score()));

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            loop_active: false,
            shown_mode: None,
        }));

        setup_keyboard(app.clone());
        setup_button("startButton", app.clone());
        setup_button("retryButton", app.clone());
        setup_upgrade_clicks(app.clone());
        sync_ui(&mut app.borrow_mut());

        log::info!("Wave Survivor ready");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                if [KEY_UP, KEY_DOWN, KEY_LEFT, KEY_RIGHT].contains(&key.as_str()) {
                    event.prevent_default();
                }
                {
                    let mut a = app.borrow_mut();
                    a.game.key_down(&key);
                    sync_ui(&mut a);
                }
                ensure_loop(app.clone());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Start/retry buttons both begin a new run
    fn setup_button(id: &str, app: Rc<RefCell<App>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            {
                let mut a = app.borrow_mut();
                if matches!(a.game.mode(), GameMode::Start | GameMode::GameOver) {
                    a.game.start();
                }
                sync_ui(&mut a);
            }
            ensure_loop(app.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Upgrade click handler, installed once on the options container
    ///
    /// Buttons are rebuilt on every prompt and carry their slot in
    /// `SLOT_ATTR`, so no per-button listeners exist.
    fn setup_upgrade_clicks(app: Rc<RefCell<App>>) {
        let Some(container) = document().and_then(|d| d.get_element_by_id(UPGRADE_OPTIONS_ID))
        else {
            log::warn!("#{} missing, upgrades only selectable by key", UPGRADE_OPTIONS_ID);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let slot = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&format!("[{}]", SLOT_ATTR)).ok().flatten())
                .and_then(|el| el.get_attribute(SLOT_ATTR))
                .and_then(|value| ui::slot_from_attr(&value));
            let Some(slot) = slot else {
                return;
            };
            {
                let mut a = app.borrow_mut();
                a.game.choose_upgrade(slot);
                sync_ui(&mut a);
            }
            ensure_loop(app.clone());
        });
        let _ =
            container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One button per upgrade offer, rebuilt each time the prompt opens
    fn build_upgrade_buttons(app: &App, document: &Document) {
        let Some(container) = document.get_element_by_id(UPGRADE_OPTIONS_ID) else {
            log::warn!("#{} missing, cannot show upgrade offers", UPGRADE_OPTIONS_ID);
            return;
        };
        container.set_inner_html("");
        for (slot, option) in app.game.upgrade_choices().iter().enumerate() {
            let Ok(btn) = document.create_element("button") else {
                continue;
            };
            btn.set_text_content(Some(&ui::upgrade_label(slot, option)));
            let _ = btn.set_attribute(SLOT_ATTR, &ui::slot_attr_value(slot));
            let _ = container.append_child(&btn);
        }
    }

    /// Show the panels that belong to the current mode
    fn sync_ui(app: &mut App) {
        let Some(document) = document() else {
            return;
        };
        let mode = app.game.mode();

        if let Some(world) = app.game.world() {
            set_text(&document, "status", &ui::status_line(world));
        }

        if app.shown_mode == Some(mode) {
            return;
        }
        app.shown_mode = Some(mode);
        log::debug!("UI mode: {:?}", mode);

        set_visible(&document, "startButton", mode == GameMode::Start);
        set_visible(&document, "gameOverScreen", mode == GameMode::GameOver);
        set_visible(&document, "retryButton", mode == GameMode::GameOver);
        set_visible(&document, "upgradeScreen", mode == GameMode::PausedUpgrade);

        if mode == GameMode::GameOver {
            if let Some(summary) = app.game.game_over_summary() {
                if let Some(el) = document.get_element_by_id("finalScore") {
                    el.set_inner_html("");
                    for line in ui::game_over_lines(&summary) {
                        if let Ok(div) = document.create_element("div") {
                            div.set_text_content(Some(&line));
                            let _ = el.append_child(&div);
                        }
                    }
                }
            }
            set_text(
                &document,
                "highScore",
                &ui::high_score_line(app.game.high_score()),
            );
        }
    }

    /// Add the shake class to the canvas and drop it again shortly after
    fn shake_screen() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(canvas) = document().and_then(|d| d.get_element_by_id("gameCanvas")) else {
            return;
        };
        let _ = canvas.class_list().add_1("shake");
        let closure = Closure::once_into_js(move || {
            let _ = canvas.class_list().remove_1("shake");
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.unchecked_ref(),
            SHAKE_MS,
        );
    }

    /// Schedule frames if the game wants them and none are pending
    fn ensure_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.loop_active || !a.game.wants_frame() {
                return;
            }
            a.loop_active = true;
        }
        request_animation_frame(app);
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
        let again = {
            let mut a = app.borrow_mut();
            a.game.frame(time);

            if let (Some(renderer), Some(world)) = (a.renderer.as_ref(), a.game.world()) {
                if a.game.death_animation_active() {
                    renderer.draw(&renderer::death_frame(world));
                } else if a.game.mode() == GameMode::Running
                    || a.game.mode() == GameMode::PausedUpgrade
                {
                    renderer.draw(&renderer::live_frame(world));
                }
            }

            for event in a.game.drain_events() {
                if event == GameEvent::ScreenShake {
                    shake_screen();
                }
            }

            let entering_prompt = a.game.mode() == GameMode::PausedUpgrade
                && a.shown_mode != Some(GameMode::PausedUpgrade);
            if entering_prompt {
                if let Some(document) = document() {
                    build_upgrade_buttons(&a, &document);
                }
            }
            sync_ui(&mut a);

            let again = a.game.wants_frame();
            a.loop_active = again;
            again
        };

        if again {
            request_animation_frame(app);
        }
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

/// Simulated time limit for the headless run
#[cfg(not(target_arch = "wasm32"))]
const AUTOPILOT_LIMIT_MS: f64 = 10.0 * 60.0 * 1000.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use wave_survivor::{Game, GameMode, MemoryStore, Settings, ui};

    env_logger::init();

    let args = match cli::RunArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            log::error!("usage: wave-survivor [seed] [--quality low|medium|high]");
            std::process::exit(2);
        }
    };
    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    log::info!(
        "Wave Survivor (native) starting headless run, seed {}, quality {}",
        seed,
        args.quality.as_str()
    );

    let mut game = Game::new(Settings::from_preset(args.quality), MemoryStore::new(), seed);
    game.start();

    let mut t = 0.0;
    while t < AUTOPILOT_LIMIT_MS {
        match game.mode() {
            GameMode::Running => autopilot::steer(&mut game),
            GameMode::PausedUpgrade => {
                game.choose_upgrade(0);
            }
            GameMode::GameOver | GameMode::Start => break,
            GameMode::Dying => {}
        }
        t += 16.0;
        game.frame(t);
        game.drain_events();
    }

    // Let the summary appear if the run just ended
    while game.mode() == GameMode::Dying {
        t += 16.0;
        game.frame(t);
    }

    if let Some(world) = game.world() {
        log::info!("{}", ui::status_line(world));
    }
    match game.game_over_summary() {
        Some(summary) => {
            for line in ui::game_over_lines(&summary) {
                log::info!("{}", line);
            }
        }
        None => log::info!("Autopilot still alive after time limit"),
    }
    log::info!("{}", ui::high_score_line(game.high_score()));
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use wave_survivor::QualityPreset;

    /// Command line of the headless run
    #[derive(Debug, Default, PartialEq)]
    pub struct RunArgs {
        pub seed: Option<u64>,
        pub quality: QualityPreset,
    }

    impl RunArgs {
        /// `[seed] [--quality low|medium|high]`
        pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
            let mut parsed = RunArgs::default();
            let mut args = args.into_iter();
            while let Some(arg) = args.next() {
                if arg == "--quality" {
                    let value = args
                        .next()
                        .ok_or_else(|| "--quality needs a value".to_string())?;
                    parsed.quality = value.parse()?;
                } else {
                    let seed = arg
                        .parse::<u64>()
                        .map_err(|_| format!("invalid seed: {}", arg))?;
                    parsed.seed = Some(seed);
                }
            }
            Ok(parsed)
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;
    use wave_survivor::input::{KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_UP};
    use wave_survivor::{Game, MemoryStore};

    /// Enemies closer than this are worth running from
    const DANGER_RADIUS: f32 = 150.0;

    /// Hold the arrow keys that lead away from nearby enemies and toward the center
    pub fn steer(game: &mut Game<MemoryStore>) {
        let Some(world) = game.world() else {
            return;
        };
        let pos = world.player.pos;
        let center = Vec2::new(
            wave_survivor::consts::CANVAS_WIDTH / 2.0,
            wave_survivor::consts::CANVAS_HEIGHT / 2.0,
        );

        let mut push = (center - pos) * 0.002;
        for enemy in &world.enemies {
            let away = pos - enemy.pos;
            let dist = away.length();
            if dist > 0.0 && dist < DANGER_RADIUS {
                push += away / (dist * dist) * DANGER_RADIUS;
            }
        }

        let keys = [
            (KEY_LEFT, push.x < -0.1),
            (KEY_RIGHT, push.x > 0.1),
            (KEY_UP, push.y < -0.1),
            (KEY_DOWN, push.y > 0.1),
        ];
        for (key, held) in keys {
            if held {
                game.key_down(key);
            } else {
                game.key_up(key);
            }
        }
    }
}
