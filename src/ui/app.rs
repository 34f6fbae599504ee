//! Page controller
//!
//! Owns the current route and page state, turns UI actions into store and
//! engine calls, and renders the whole page. The browser front-end only
//! forwards DOM events here and mounts the returned HTML.

use super::route::Route;
use super::view;
use crate::game::{self, GameEvent, GameState};
use crate::manage::{SetManager, WordEditor};
use crate::platform::storage::with_store;
use crate::settings::Settings;
use crate::store::{self, SetId, WordId, WordSet};

/// A user interaction, decoded from `data-*` attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Pick(usize),
    PlayAgain,
    SubmitSet,
    DeleteSet(SetId),
    SubmitWord,
    EditWord(WordId),
    CancelEdit,
    DeleteWord(WordId),
    Input { field: Field, value: String },
}

/// Text inputs the forms track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SetName,
    Word,
    Translation,
}

impl Field {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "set-name" => Some(Field::SetName),
            "word" => Some(Field::Word),
            "translation" => Some(Field::Translation),
            _ => None,
        }
    }
}

impl Action {
    /// Decode a click: `data-action` plus its `data-index`/`data-id`
    pub fn from_click(action: &str, index: Option<&str>, id: Option<&str>) -> Option<Self> {
        let index = index.and_then(|v| v.parse::<usize>().ok());
        let id = id.and_then(|v| v.parse::<u32>().ok());
        match action {
            "pick" => index.map(Action::Pick),
            "play-again" => Some(Action::PlayAgain),
            "delete-set" => id.map(|id| Action::DeleteSet(SetId(id))),
            "edit-word" => id.map(|id| Action::EditWord(WordId(id))),
            "delete-word" => id.map(|id| Action::DeleteWord(WordId(id))),
            "cancel-edit" => Some(Action::CancelEdit),
            _ => None,
        }
    }

    /// Decode a form submit from its `data-form`
    pub fn from_submit(form: &str) -> Option<Self> {
        match form {
            "add-set" => Some(Action::SubmitSet),
            "save-word" => Some(Action::SubmitWord),
            _ => None,
        }
    }
}

/// What the front-end should do after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing visible changed
    Unchanged,
    /// Re-mount the page
    Render,
    /// Point the location at another route
    Redirect(Route),
}

#[derive(Debug)]
enum Page {
    Loading,
    Home {
        sets: Vec<WordSet>,
    },
    Practice {
        set: WordSet,
        game: GameState,
    },
    EmptySet {
        set: WordSet,
    },
    Manage {
        sets: SetManager,
        editor: Option<WordEditor>,
    },
    NotFound(String),
    Error(String),
}

/// The whole app: one route, one page
#[derive(Debug)]
pub struct App {
    route: Route,
    page: Page,
    settings: Settings,
    /// Last session epoch handed out
    epochs: u64,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            route: Route::Home,
            page: Page::Loading,
            settings,
            epochs: 0,
        }
    }

    /// One-time startup: open the store and seed the example set if empty
    pub fn init() -> store::Result<bool> {
        with_store(|store| store.seed_if_empty())
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Load the page for `route`. Any running session is dropped.
    pub fn navigate(&mut self, route: Route) {
        log::info!("Navigate to {}", route.path());
        self.route = route.clone();
        let page = self.load(route);
        self.page = self.or_error(page);
    }

    fn load(&mut self, route: Route) -> store::Result<Page> {
        match route {
            Route::Home => Ok(Page::Home {
                sets: with_store(|s| Ok(s.all_sets()))?,
            }),
            Route::Practice(id) => {
                let (set, words) = with_store(|s| Ok((s.set_info(id)?, s.words_by_set(id))))?;
                match GameState::with_settings(words, crate::now_ms(), self.settings.clone()) {
                    Ok(game) => {
                        let game = game.with_epoch(self.next_epoch());
                        Ok(Page::Practice { set, game })
                    }
                    Err(e) => {
                        log::warn!("Set {}: {}", id, e);
                        Ok(Page::EmptySet { set })
                    }
                }
            }
            Route::Manage => Ok(Page::Manage {
                sets: with_store(|s| Ok(SetManager::load(s)))?,
                editor: None,
            }),
            Route::ManageSet(id) => with_store(|s| {
                Ok(Page::Manage {
                    sets: SetManager::load(s),
                    editor: Some(WordEditor::load(s, id)),
                })
            }),
            Route::NotFound(path) => Ok(Page::NotFound(path)),
        }
    }

    fn next_epoch(&mut self) -> u64 {
        self.epochs += 1;
        self.epochs
    }

    fn or_error(&self, page: store::Result<Page>) -> Page {
        page.unwrap_or_else(|e| {
            log::error!("{}: {}", self.route.path(), e);
            Page::Error(e.to_string())
        })
    }

    /// Apply a user action
    pub fn handle(&mut self, action: Action) -> Outcome {
        match self.apply(action) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("{}: {}", self.route.path(), e);
                self.page = Page::Error(e.to_string());
                Outcome::Render
            }
        }
    }

    fn apply(&mut self, action: Action) -> store::Result<Outcome> {
        let epoch = self.next_epoch_peek();
        match (&mut self.page, action) {
            (Page::Practice { game, .. }, Action::Pick(index)) => {
                let events = game::select(game, index);
                log_events(&events);
                Ok(changed(&events))
            }
            (Page::Practice { game, .. }, Action::PlayAgain) => {
                *game = game.play_again(crate::now_ms()).with_epoch(epoch);
                self.epochs = epoch;
                Ok(Outcome::Render)
            }
            (Page::Manage { sets, editor }, Action::Input { field, value }) => {
                match field {
                    Field::SetName => sets.new_set_name = value,
                    Field::Word => {
                        if let Some(editor) = editor {
                            editor.word_input = value;
                        }
                    }
                    Field::Translation => {
                        if let Some(editor) = editor {
                            editor.translation_input = value;
                        }
                    }
                }
                // The input already shows what was typed
                Ok(Outcome::Unchanged)
            }
            (Page::Manage { sets, .. }, Action::SubmitSet) => {
                with_store(|s| sets.submit(s))?;
                Ok(Outcome::Render)
            }
            (Page::Manage { sets, editor }, Action::DeleteSet(id)) => {
                with_store(|s| sets.delete(s, id))?;
                if editor.as_ref().is_some_and(|e| e.set_id == id) {
                    *editor = None;
                    return Ok(Outcome::Redirect(Route::Manage));
                }
                Ok(Outcome::Render)
            }
            (Page::Manage { editor: Some(editor), .. }, Action::SubmitWord) => {
                with_store(|s| editor.submit(s))?;
                Ok(Outcome::Render)
            }
            (Page::Manage { editor: Some(editor), .. }, Action::EditWord(id)) => {
                with_store(|s| editor.begin_edit_id(s, id))?;
                Ok(Outcome::Render)
            }
            (Page::Manage { editor: Some(editor), .. }, Action::CancelEdit) => {
                editor.cancel_edit();
                Ok(Outcome::Render)
            }
            (Page::Manage { editor: Some(editor), .. }, Action::DeleteWord(id)) => {
                with_store(|s| editor.delete(s, id))?;
                Ok(Outcome::Render)
            }
            (_, action) => {
                log::debug!("Ignoring {:?} on {}", action, self.route.path());
                Ok(Outcome::Unchanged)
            }
        }
    }

    fn next_epoch_peek(&self) -> u64 {
        self.epochs + 1
    }

    /// Epoch of the running session, if the page has one
    pub fn session_epoch(&self) -> Option<u64> {
        match &self.page {
            Page::Practice { game, .. } => Some(game.epoch),
            _ => None,
        }
    }

    /// Whether session `epoch` still has a clock to drive
    pub fn needs_frames(&self, epoch: u64) -> bool {
        match &self.page {
            Page::Practice { game, .. } => game.is_current(epoch) && !game.is_settled(),
            _ => false,
        }
    }

    /// Advance the session started as `epoch` by `dt_ms`.
    /// Returns true when the page needs re-rendering.
    pub fn frame(&mut self, epoch: u64, dt_ms: u64) -> bool {
        let Page::Practice { game, .. } = &mut self.page else {
            return false;
        };
        let events = game::advance_session(game, epoch, dt_ms);
        log_events(&events);
        !events.is_empty()
    }

    /// Whole page, chrome included
    pub fn render(&self) -> String {
        let body = match &self.page {
            Page::Loading => view::loading(),
            Page::Home { sets } => view::home(sets),
            Page::Practice { set, game } => view::practice(&set.name, game),
            Page::EmptySet { set } => view::empty_set(&set.name, set.id),
            Page::Manage { sets, editor } => view::manage(sets, editor.as_ref()),
            Page::NotFound(path) => view::not_found(path),
            Page::Error(message) => view::error(message),
        };
        view::layout(&body)
    }
}

fn changed(events: &[GameEvent]) -> Outcome {
    if events.is_empty() {
        Outcome::Unchanged
    } else {
        Outcome::Render
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Countdown { .. } | GameEvent::Selected { .. } => {
                log::trace!("{:?}", event)
            }
            _ => log::debug!("{:?}", event),
        }
    }
}
