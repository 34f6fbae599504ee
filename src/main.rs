//! Matching Madness entry point
//!
//! Handles platform-specific initialization and wires the page to the app.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlInputElement};

    use matching_madness::Settings;
    use matching_madness::consts::MAX_FRAME_MS;
    use matching_madness::ui::{Action, App, Field, Outcome, Route, view};

    /// App plus the element it renders into
    struct Shell {
        app: App,
        root: Element,
    }

    impl Shell {
        fn mount(&self) {
            self.root.set_inner_html(&self.app.render());
        }
    }

    fn current_route() -> Route {
        let hash = web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default();
        Route::parse(&hash)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Matching Madness starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let root = document.get_element_by_id("app").expect("no #app element");

        // First-run seeding happens here and nowhere else
        match App::init() {
            Ok(true) => log::info!("First run: example set created"),
            Ok(false) => {}
            Err(e) => {
                log::error!("Word store unavailable: {}", e);
                root.set_inner_html(&view::layout(&view::error(&e.to_string())));
                return;
            }
        }

        let shell = Rc::new(RefCell::new(Shell {
            app: App::new(Settings::load()),
            root,
        }));

        setup_click_handler(shell.clone());
        setup_submit_handler(shell.clone());
        setup_input_handler(shell.clone());
        setup_hash_router(shell.clone());

        navigate(&shell);

        log::info!("Matching Madness running!");
    }

    /// Load the page for the current location
    fn navigate(shell: &Rc<RefCell<Shell>>) {
        let route = current_route();
        {
            let mut s = shell.borrow_mut();
            s.app.navigate(route);
            s.mount();
        }
        start_session_loop(shell.clone());
    }

    fn dispatch(shell: &Rc<RefCell<Shell>>, action: Action) {
        let before = shell.borrow().app.session_epoch();
        let outcome = shell.borrow_mut().app.handle(action);
        match outcome {
            Outcome::Unchanged => {}
            Outcome::Render => shell.borrow().mount(),
            Outcome::Redirect(route) => {
                // hashchange brings us back through navigate()
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_hash(&route.path());
                }
            }
        }

        // Play-again starts a new session
        let after = shell.borrow().app.session_epoch();
        if after.is_some() && after != before {
            start_session_loop(shell.clone());
        }
    }

    fn event_element(event: &web_sys::Event) -> Option<Element> {
        event.target()?.dyn_into::<Element>().ok()
    }

    fn setup_click_handler(shell: Rc<RefCell<Shell>>) {
        let root = shell.borrow().root.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(el) = event_element(&event)
                .and_then(|t| t.closest("[data-action]").ok().flatten())
            else {
                return;
            };
            let Some(name) = el.get_attribute("data-action") else {
                return;
            };
            let index = el.get_attribute("data-index");
            let id = el.get_attribute("data-id");
            if let Some(action) = Action::from_click(&name, index.as_deref(), id.as_deref()) {
                dispatch(&shell, action);
            }
        });
        let _ = root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_submit_handler(shell: Rc<RefCell<Shell>>) {
        let root = shell.borrow().root.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let form = event_element(&event).and_then(|el| el.get_attribute("data-form"));
            if let Some(action) = form.as_deref().and_then(Action::from_submit) {
                dispatch(&shell, action);
            }
        });
        let _ = root.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handler(shell: Rc<RefCell<Shell>>) {
        let root = shell.borrow().root.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let field = input
                .get_attribute("data-field")
                .as_deref()
                .and_then(Field::parse);
            if let Some(field) = field {
                dispatch(
                    &shell,
                    Action::Input {
                        field,
                        value: input.value(),
                    },
                );
            }
        });
        let _ = root.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_hash_router(shell: Rc<RefCell<Shell>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            navigate(&shell);
        });
        let _ =
            window.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Drive the current session's clock until the session is replaced
    fn start_session_loop(shell: Rc<RefCell<Shell>>) {
        let Some(epoch) = shell.borrow().app.session_epoch() else {
            return;
        };
        request_animation_frame(shell, epoch, None);
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>, epoch: u64, last_time: Option<f64>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(shell, epoch, last_time, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(shell: Rc<RefCell<Shell>>, epoch: u64, last_time: Option<f64>, time: f64) {
        let next_last = {
            let mut s = shell.borrow_mut();
            if s.app.session_epoch() != Some(epoch) {
                log::debug!("Frame loop for session {} stopped", epoch);
                return;
            }

            // Whole milliseconds only; the fraction carries into the next frame
            let (dt, next_last) = match last_time {
                Some(last) => {
                    let elapsed = (time - last).max(0.0);
                    if elapsed > MAX_FRAME_MS as f64 {
                        (MAX_FRAME_MS, time)
                    } else {
                        let whole = elapsed.floor();
                        (whole as u64, last + whole)
                    }
                }
                None => (0, time),
            };

            if s.app.frame(epoch, dt) {
                s.mount();
            }
            if !s.app.needs_frames(epoch) {
                log::debug!("Session {} settled, frame loop stopped", epoch);
                return;
            }
            next_last
        };

        request_animation_frame(shell, epoch, Some(next_last));
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Matching Madness (native) starting...");
    log::info!("The game runs in the browser - use `trunk serve` for the web version");

    if let Err(e) = play_example_round() {
        log::error!("Example round failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Seed the in-memory store and clear the example set headlessly
#[cfg(not(target_arch = "wasm32"))]
fn play_example_round() -> Result<(), Box<dyn std::error::Error>> {
    use matching_madness::game::{self, GameState};
    use matching_madness::platform::storage::with_store;

    with_store(|store| store.seed_if_empty())?;
    let (set, words) = with_store(|store| {
        let set = store
            .all_sets()
            .into_iter()
            .next()
            .ok_or_else(|| matching_madness::StoreError::Unavailable("no sets".to_string()))?;
        let words = store.words_by_set(set.id);
        Ok((set, words))
    })?;

    let mut state = GameState::new(words.clone(), matching_madness::now_ms())?;
    for word in &words {
        let picks: Vec<usize> = state
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.id == word.id)
            .map(|(i, _)| i)
            .collect();
        for index in picks {
            game::select(&mut state, index);
        }
        game::advance(&mut state, matching_madness::consts::REVEAL_DELAY_MS);
    }

    println!(
        "{}: matched {}/{} pairs in {} ms -> {:?}",
        set.name,
        state.matches(),
        state.total_pairs(),
        state.clock_ms,
        state.phase
    );
    Ok(())
}
