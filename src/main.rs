//! RC Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};

    use rc_runner::sim::{BoxView, Catalog, EntityKind, GamePhase};
    use rc_runner::{FrameScheduler, Session, Tuning};

    /// Image per drawable handle, in handle order of the default catalog
    const IMAGE_PATHS: [&str; 6] = [
        "assets/icon-code.png",
        "assets/icon-support.png",
        "assets/icon-community.png",
        "assets/obstacle-bug.png",
        "assets/obstacle-deadline.png",
        "assets/obstacle-stress.png",
    ];

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame` / `cancelAnimationFrame`
    struct RafScheduler {
        callback: FrameCallback,
    }

    impl FrameScheduler for RafScheduler {
        type Handle = i32;

        fn request_frame(&mut self) -> i32 {
            let Some(window) = web_sys::window() else {
                return 0;
            };
            match self.callback.borrow().as_ref() {
                Some(cb) => window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .unwrap_or_else(|e| {
                        log::error!("requestAnimationFrame failed: {:?}", e);
                        0
                    }),
                None => 0,
            }
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session<RafScheduler>,
        ctx: CanvasRenderingContext2d,
        images: Vec<HtmlImageElement>,
    }

    impl Game {
        /// Draw the current frame
        fn render(&self) {
            let snap = self.session.snapshot();
            let tuning = self.session.tuning();
            let ctx = &self.ctx;

            ctx.clear_rect(0.0, 0.0, tuning.field_width as f64, tuning.field_height as f64);

            // The runner wears the first collectible icon
            let player_sprite = self.session.catalog().entries(EntityKind::Collectible)[0].drawable;
            self.draw_sprite(player_sprite.0 as usize, &snap.player);

            for entity in &snap.entities {
                self.draw_sprite(entity.drawable.0 as usize, &entity.rect);
                ctx.set_font("14px 'Press Start 2P'");
                ctx.set_text_align("center");
                ctx.set_fill_style_str("#FFFFFF");
                let _ = ctx.fill_text(
                    &entity.display_name,
                    (entity.rect.x + entity.rect.w / 2.0) as f64,
                    (entity.rect.y - 10.0) as f64,
                );
            }

            // Ground
            ctx.set_fill_style_str("#53a8b6");
            ctx.fill_rect(
                0.0,
                tuning.ground_y() as f64,
                tuning.field_width as f64,
                tuning.ground_offset as f64,
            );

            // Score on canvas
            ctx.set_font("20px 'Press Start 2P'");
            ctx.set_fill_style_str("#FFFFFF");
            ctx.set_text_align("left");
            let _ = ctx.fill_text(&format!("Promises: {}", snap.score), 20.0, 40.0);
        }

        fn draw_sprite(&self, handle: usize, rect: &BoxView) {
            let (x, y, w, h) = (rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            match self.images.get(handle) {
                Some(img) if img.complete() && img.natural_width() > 0 => {
                    let _ = self
                        .ctx
                        .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h);
                }
                _ => {
                    // Image not loaded (yet): placeholder block
                    self.ctx.set_fill_style_str("#e94560");
                    self.ctx.fill_rect(x, y, w, h);
                }
            }
        }

        /// Show/hide the start and game-over screens
        fn update_overlays(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.session.phase();

            if let Some(el) = document.get_element_by_id("start-screen") {
                let _ = if phase == GamePhase::Idle {
                    el.class_list().remove_1("hidden")
                } else {
                    el.class_list().add_1("hidden")
                };
            }

            if let Some(el) = document.get_element_by_id("game-over-screen") {
                if phase == GamePhase::Over {
                    let _ = el.class_list().remove_1("hidden");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.session.score().to_string()));
                    }
                } else {
                    let _ = el.class_list().add_1("hidden");
                }
            }

            // Start stays disabled until every image has loaded or failed
            if let Some(el) = document.get_element_by_id("start-button") {
                let _ = if self.session.assets_ready() {
                    el.remove_attribute("disabled")
                } else {
                    el.set_attribute("disabled", "")
                };
            }

            // Score is drawn on the canvas
            if let Some(el) = document.get_element_by_id("score-display") {
                let _ = el.class_list().add_1("hidden");
            }
        }
    }

    /// Start loading every sprite; each load or error is reported to the session
    fn load_images(game: &Rc<RefCell<Game>>) -> Vec<HtmlImageElement> {
        IMAGE_PATHS
            .iter()
            .filter_map(|path| {
                let img = HtmlImageElement::new().ok()?;
                for (event, loaded) in [("load", true), ("error", false)] {
                    let game = game.clone();
                    let path = *path;
                    let closure = Closure::<dyn FnMut()>::new(move || {
                        if !loaded {
                            log::warn!("Failed to load {}", path);
                        }
                        let mut g = game.borrow_mut();
                        g.session.asset_settled(loaded);
                        g.update_overlays();
                    });
                    let _ = img
                        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
                    closure.forget();
                }
                img.set_src(path);
                Some(img)
            })
            .collect()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("RC Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let tuning = Tuning {
            field_width: canvas.width() as f32,
            field_height: canvas.height() as f32,
            ..Tuning::default()
        };

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler {
            callback: callback.clone(),
        };

        let seed = js_sys::Date::now() as u64;
        let session = match Session::new(tuning, Catalog::default(), seed, scheduler) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid game setup: {}", e);
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game {
            session,
            ctx,
            images: Vec::new(),
        }));

        // Load and error events fire asynchronously, after this borrow ends
        let images = load_images(&game);
        {
            let mut g = game.borrow_mut();
            g.session.expect_assets(images.len());
            g.images = images;
        }

        // Frame loop: the session requests and cancels frames itself
        {
            let game = game.clone();
            *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                let mut g = game.borrow_mut();
                g.session.tick(time);
                g.render();
                g.update_overlays();
            }));
        }

        setup_buttons(&document, game.clone());
        setup_keyboard(&window, game.clone());

        let g = game.borrow();
        g.render();
        g.update_overlays();

        log::info!("RC Runner ready (seed {})", seed);
    }

    fn setup_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        for (id, restart) in [("start-button", false), ("restart-button", true)] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if restart {
                    g.session.on_restart();
                } else {
                    g.session.on_start();
                }
                g.update_overlays();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.code() == "Space" {
                // Keep the page from scrolling
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.session.on_primary_action();
                g.update_overlays();
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rc_runner::consts::SIM_DT;
    use rc_runner::sim::{Catalog, EntityKind, GameEvent};
    use rc_runner::{FrameScheduler, Session, Tuning, TuningError};

    /// Frames run back to back on a synthetic clock
    #[derive(Default)]
    struct ManualScheduler {
        requested: u64,
    }

    impl FrameScheduler for ManualScheduler {
        type Handle = u64;

        fn request_frame(&mut self) -> u64 {
            self.requested += 1;
            self.requested
        }

        fn cancel_frame(&mut self, handle: u64) {
            log::debug!("Frame {} cancelled", handle);
        }
    }

    /// Longest demo run (simulated seconds)
    const MAX_SECONDS: f64 = 120.0;

    /// Seconds of lead the autopilot gives an approaching obstacle
    const JUMP_LEAD: f32 = 0.15;

    /// Play one session with a naive autopilot; returns the final score
    pub fn run(tuning: Tuning, seed: u64) -> Result<u64, TuningError> {
        let mut session = Session::new(tuning, Catalog::default(), seed, ManualScheduler::default())?;
        session.on_start();

        let frame_ms = SIM_DT as f64 * 1000.0;
        let mut t = 0.0;
        let mut collected = 0u32;
        while session.has_pending_frame() && t < MAX_SECONDS * 1000.0 {
            if obstacle_ahead(&session) {
                session.on_jump();
            }
            for event in session.tick(t) {
                if let GameEvent::Collected { name, score, .. } = event {
                    collected += 1;
                    log::debug!("Collected {} (score {})", name, score);
                }
            }
            t += frame_ms;
        }

        log::info!(
            "Demo finished at {:.1}s in {:?}: {} collected, speed {:.1}, spawn interval {:.0}ms",
            t / 1000.0,
            session.phase(),
            collected,
            session.state().speed,
            session.state().spawn_interval_ms
        );
        Ok(session.score())
    }

    fn obstacle_ahead(session: &Session<ManualScheduler>) -> bool {
        let state = session.state();
        if !state.player.on_ground {
            return false;
        }
        let player = state.player.bounds();
        let reach = state.speed * JUMP_LEAD;
        state.entities.iter().any(|e| {
            let gap = e.bounds().left() - player.right();
            e.kind == EntityKind::Obstacle && gap >= 0.0 && gap < reach
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("RC Runner (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    // Optional tuning JSON as the first argument
    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| rc_runner::Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => rc_runner::Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    match headless::run(tuning, seed) {
        Ok(score) => println!("Final score: {}", score),
        Err(e) => {
            log::error!("Invalid game setup: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
