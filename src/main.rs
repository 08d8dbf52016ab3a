//! Snack Drop entry point
//!
//! Handles platform-specific initialization and runs the game loop.
//! The wasm host owns the DOM, input listeners, audio, and high-score
//! persistence; all gameplay happens inside `snack_drop::sim`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent, TouchEvent};

    use snack_drop::audio::AudioManager;
    use snack_drop::consts::{MAX_SUBSTEPS, TICK_MS};
    use snack_drop::highscore;
    use snack_drop::sim::{
        FlashKind, GameEvent, GameState, InputEvent, InputQueue, ItemKind, Key, RoundPhase,
        Snapshot, tick,
    };

    /// Glyph pools per category. An item keeps one glyph for its whole
    /// fall, picked by id, so the host needs no RNG of its own.
    const HIGH_VALUE_GLYPHS: &[&str] = &["\u{1F354}"]; // 🍔
    const LOW_VALUE_GLYPHS: &[&str] = &[
        "\u{1F355}", // 🍕
        "\u{1F32D}", // 🌭
        "\u{1F35F}", // 🍟
        "\u{1F369}", // 🍩
        "\u{1F36A}", // 🍪
        "\u{1F9C1}", // 🧁
        "\u{1F36B}", // 🍫
        "\u{1F36D}", // 🍭
    ];
    const PENALTY_GLYPHS: &[&str] = &[
        "\u{1F966}", // 🥦
        "\u{1F955}", // 🥕
        "\u{1F96C}", // 🥬
        "\u{1F345}", // 🍅
        "\u{1F952}", // 🥒
        "\u{1F33D}", // 🌽
    ];
    const POWER_UP_GLYPHS: &[&str] = &["\u{2B50}"]; // ⭐

    fn glyph_for(kind: ItemKind, id: u64) -> &'static str {
        let pool = match kind {
            ItemKind::HighValue => HIGH_VALUE_GLYPHS,
            ItemKind::LowValue => LOW_VALUE_GLYPHS,
            ItemKind::Penalty => PENALTY_GLYPHS,
            ItemKind::PowerUp => POWER_UP_GLYPHS,
        };
        pool[(id % pool.len() as u64) as usize]
    }

    const CSS: &str = "
        body { margin: 0; display: flex; flex-direction: column; align-items: center;
               justify-content: center; min-height: 100vh; background: #14141e;
               color: #e8e8f0; font-family: system-ui, sans-serif; user-select: none; }
        #hud { width: min(92vw, 480px); display: flex; justify-content: space-between;
               padding: 8px 4px; font-weight: 700; font-size: 18px; }
        #field { position: relative; width: min(92vw, 480px); height: 70vh;
                 border: 1px solid #3a3a50; border-radius: 12px; overflow: hidden;
                 touch-action: none;
                 background: linear-gradient(180deg, #1b2336 0%, #2d2840 60%, #181c26 100%); }
        .item { position: absolute; font-size: 28px; transform: translate(-50%, -50%);
                pointer-events: none; }
        #catcher { position: absolute; bottom: 4%; font-size: 44px;
                   transform: translateX(-50%); pointer-events: none;
                   filter: drop-shadow(0 2px 4px rgba(0,0,0,0.5)); }
        #catcher.flash-good { filter: drop-shadow(0 0 12px rgba(64,220,160,0.8)); }
        #catcher.flash-bad { filter: drop-shadow(0 0 12px rgba(240,70,70,0.8)); }
        #catcher.flash-power { filter: drop-shadow(0 0 14px rgba(255,210,60,0.9)); }
        .overlay { position: absolute; inset: 0; display: flex; flex-direction: column;
                   align-items: center; justify-content: center; gap: 8px; z-index: 10;
                   background: rgba(20,20,30,0.85); text-align: center; }
        .overlay.hidden { display: none; }
        .overlay h1 { margin: 0; font-size: 26px; }
        #restart-btn { margin-top: 12px; padding: 10px 28px; font-size: 18px;
                       font-weight: 700; border: 0; border-radius: 8px;
                       background: #f0a830; color: #1a1a24; cursor: pointer; }
    ";

    /// Game instance holding all host-side state
    struct Game {
        state: GameState,
        input: InputQueue,
        audio: AudioManager,
        accumulator: f64,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let mut state = GameState::new(seed);
            state.high_score = highscore::load();
            Self {
                state,
                input: InputQueue::new(),
                audio: AudioManager::new(),
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run fixed simulation ticks, then fan the ticks' events out
        /// to audio and persistence
        fn update(&mut self, dt_ms: f64) {
            // cap so a backgrounded tab doesn't replay a huge backlog
            self.accumulator += dt_ms.min(100.0);

            let step = TICK_MS as f64;
            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                let input = self.input.sample();
                tick(&mut self.state, &input);
                self.accumulator -= step;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                if let GameEvent::RoundOver {
                    new_high_score: true,
                } = event
                {
                    highscore::save(self.state.high_score);
                }
                self.audio.handle_event(event);
            }
        }
    }

    /// All DOM nodes the render path touches, created once at startup
    struct Dom {
        field: Element,
        catcher: Element,
        hud_score: Element,
        hud_high: Element,
        hud_missed: Element,
        hud_boost: Element,
        start_overlay: Element,
        over_overlay: Element,
        final_score: Element,
        new_best: Element,
        /// Live item nodes keyed by item id
        item_nodes: RefCell<HashMap<u64, Element>>,
    }

    impl Dom {
        /// Build the page: stylesheet, HUD, play field, overlays
        fn build(document: &Document) -> Result<Self, JsValue> {
            let body = document.body().ok_or("no body")?;

            let style = document.create_element("style")?;
            style.set_text_content(Some(CSS));
            body.append_child(&style)?;

            let hud = document.create_element("div")?;
            hud.set_id("hud");
            let hud_score = document.create_element("span")?;
            let hud_high = document.create_element("span")?;
            let hud_boost = document.create_element("span")?;
            let hud_missed = document.create_element("span")?;
            hud.append_child(&hud_score)?;
            hud.append_child(&hud_high)?;
            hud.append_child(&hud_boost)?;
            hud.append_child(&hud_missed)?;
            body.append_child(&hud)?;

            let field = document.create_element("div")?;
            field.set_id("field");
            body.append_child(&field)?;

            let catcher = document.create_element("div")?;
            catcher.set_id("catcher");
            catcher.set_text_content(Some("\u{1F9D2}")); // 🧒
            field.append_child(&catcher)?;

            let start_overlay = document.create_element("div")?;
            start_overlay.set_class_name("overlay");
            let title = document.create_element("h1")?;
            title.set_text_content(Some("Snack Drop"));
            let rules = document.create_element("p")?;
            rules.set_text_content(Some(
                "Catch \u{1F354} +5 and snacks +1, dodge veggies -3, grab \u{2B50} for a boost",
            ));
            let prompt = document.create_element("p")?;
            prompt.set_text_content(Some("\u{2190} \u{2192} keys or touch to play"));
            start_overlay.append_child(&title)?;
            start_overlay.append_child(&rules)?;
            start_overlay.append_child(&prompt)?;
            field.append_child(&start_overlay)?;

            let over_overlay = document.create_element("div")?;
            over_overlay.set_class_name("overlay hidden");
            let over_title = document.create_element("h1")?;
            over_title.set_text_content(Some("Game Over!"));
            let final_score = document.create_element("p")?;
            let new_best = document.create_element("p")?;
            new_best.set_text_content(Some("\u{1F3C6} New High Score!"));
            let restart = document.create_element("button")?;
            restart.set_id("restart-btn");
            restart.set_text_content(Some("Play Again"));
            over_overlay.append_child(&over_title)?;
            over_overlay.append_child(&final_score)?;
            over_overlay.append_child(&new_best)?;
            over_overlay.append_child(&restart)?;
            field.append_child(&over_overlay)?;

            Ok(Self {
                field,
                catcher,
                hud_score,
                hud_high,
                hud_missed,
                hud_boost,
                start_overlay,
                over_overlay,
                final_score,
                new_best,
                item_nodes: RefCell::new(HashMap::new()),
            })
        }

        /// Map a client x coordinate into field percent
        fn client_x_to_percent(&self, client_x: f32) -> f32 {
            let rect = self.field.get_bounding_client_rect();
            let width = rect.width() as f32;
            if width <= 0.0 {
                return 50.0;
            }
            (client_x - rect.left() as f32) / width * 100.0
        }

        /// Push one snapshot into the page
        fn render(&self, document: &Document, snap: &Snapshot) {
            self.hud_score
                .set_text_content(Some(&format!("\u{2B50} {}", snap.score)));
            self.hud_high
                .set_text_content(Some(&format!("\u{1F3C6} {}", snap.high_score)));
            self.hud_missed.set_text_content(Some(&format!(
                "\u{1F494} {}/{}",
                snap.missed, snap.miss_limit
            )));
            self.hud_boost.set_text_content(Some(&if snap.boost_active {
                format!("\u{26A1} {}s", snap.boost_secs)
            } else {
                String::new()
            }));

            let catcher_class = match snap.flash {
                Some(FlashKind::Good) => "flash-good",
                Some(FlashKind::Bad) => "flash-bad",
                Some(FlashKind::Power) => "flash-power",
                None => "",
            };
            self.catcher.set_class_name(catcher_class);
            let _ = self
                .catcher
                .set_attribute("style", &format!("left:{:.2}%;", snap.catcher_x));

            let start_class = if snap.phase == RoundPhase::NotStarted {
                "overlay"
            } else {
                "overlay hidden"
            };
            self.start_overlay.set_class_name(start_class);

            if snap.phase == RoundPhase::Ended {
                self.over_overlay.set_class_name("overlay");
                self.final_score
                    .set_text_content(Some(&format!("Score: {}", snap.score)));
                let best_style = if snap.score > 0 && snap.score as u32 >= snap.high_score {
                    ""
                } else {
                    "display:none;"
                };
                let _ = self.new_best.set_attribute("style", best_style);
            } else {
                self.over_overlay.set_class_name("overlay hidden");
            }

            // Reconcile item nodes against the live set by id
            let mut nodes = self.item_nodes.borrow_mut();
            let live: HashSet<u64> = snap.items.iter().map(|i| i.id).collect();
            for view in &snap.items {
                let node = nodes.entry(view.id).or_insert_with(|| {
                    let el = document.create_element("div").expect("create item node");
                    el.set_class_name("item");
                    el.set_text_content(Some(glyph_for(view.kind, view.id)));
                    let _ = self.field.append_child(&el);
                    el
                });
                let _ = node.set_attribute(
                    "style",
                    &format!("left:{:.2}%;top:{:.2}%;", view.x, view.y),
                );
            }
            nodes.retain(|id, node| {
                let keep = live.contains(id);
                if !keep {
                    node.remove();
                }
                keep
            });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Snack Drop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let dom = Rc::new(Dom::build(&document).expect("failed to build page"));

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone(), dom.clone());
        setup_restart_button(game.clone(), &document);

        request_animation_frame(game, dom);

        log::info!("Snack Drop running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>, dom: Rc<Dom>) {
        let window = web_sys::window().unwrap();

        // Keyboard press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => Key::Left,
                    "ArrowRight" | "d" | "D" => Key::Right,
                    _ => return,
                };
                game.borrow_mut().input.push(InputEvent::KeyDown(key));
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard release
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => Key::Left,
                    "ArrowRight" | "d" | "D" => Key::Right,
                    _ => return,
                };
                game.borrow_mut().input.push(InputEvent::KeyUp(key));
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move over the field
        {
            let game = game.clone();
            let dom_ref = dom.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let x = dom_ref.client_x_to_percent(event.client_x() as f32);
                game.borrow_mut().input.push(InputEvent::PointerMove(x));
            });
            let _ = dom
                .field
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse press starts a round
        {
            let game = game.clone();
            let dom_ref = dom.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let x = dom_ref.client_x_to_percent(event.client_x() as f32);
                game.borrow_mut().input.push(InputEvent::PointerStart(x));
            });
            let _ = dom
                .field
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let dom_ref = dom.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let x = dom_ref.client_x_to_percent(touch.client_x() as f32);
                    game.borrow_mut().input.push(InputEvent::PointerStart(x));
                }
            });
            let _ = dom
                .field
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch drag
        {
            let game = game.clone();
            let dom_ref = dom.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let x = dom_ref.client_x_to_percent(touch.client_x() as f32);
                    game.borrow_mut().input.push(InputEvent::PointerMove(x));
                }
            });
            let _ = dom
                .field
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>, document: &Document) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.request_reset();
                log::info!("Restart requested");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, dom: Rc<Dom>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, dom, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, dom: Rc<Dom>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                TICK_MS as f64
            };
            g.last_time = time;

            g.update(dt_ms);

            let document = web_sys::window().unwrap().document().unwrap();
            let snap = g.state.snapshot();
            dom.render(&document, &snap);
        }

        request_animation_frame(game, dom);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use snack_drop::sim::{GameState, InputEvent, InputQueue, ItemKind, RoundPhase, tick};
    use std::time::{SystemTime, UNIX_EPOCH};

    env_logger::init();
    log::info!("Snack Drop (native) starting...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed);
    let mut queue = InputQueue::new();

    // Headless autopilot: steer the catcher under the lowest item worth
    // catching and run until the round ends
    queue.push(InputEvent::PointerStart(50.0));
    let mut ticks = 0u64;
    while state.phase != RoundPhase::Ended && ticks < 60 * 60 * 5 {
        let target = state
            .items
            .iter()
            .filter(|item| item.kind != ItemKind::Penalty)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|item| item.pos.x);
        if let Some(x) = target {
            queue.push(InputEvent::PointerMove(x));
        }

        let input = queue.sample();
        tick(&mut state, &input);
        state.drain_events();
        ticks += 1;

        // one status line per simulated second
        if ticks % 60 == 0 {
            log::info!(
                "t={}s score={} missed={} items={} boost={}",
                ticks / 60,
                state.score,
                state.missed,
                state.items.len(),
                state.boost.is_active(),
            );
        }
    }

    println!(
        "Round over after {} ticks: score {}, missed {}, high score {}",
        ticks, state.score, state.missed, state.high_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
