//! HTML views
//!
//! Every page renders to a string that the front-end mounts into `#app`.
//! Interactive elements carry `data-action` (clicks), `data-form` (submits)
//! or `data-field` (text inputs) attributes for delegated event handling.

use std::fmt::Write;

use super::route::Route;
use crate::game::{CardStyle, GamePhase, GameState, card_style};
use crate::manage::{SetManager, WordEditor};
use crate::store::{SetId, WordSet};

/// Escape text for HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Header chrome around a page body
pub fn layout(body: &str) -> String {
    format!(
        concat!(
            "<header class=\"nav\">",
            "<div class=\"brand\">Language Learning</div>",
            "<nav><a href=\"{home}\">Home</a><a href=\"{manage}\">Manage Words</a></nav>",
            "</header>",
            "<main class=\"page\">{body}</main>"
        ),
        home = Route::Home.href(),
        manage = Route::Manage.href(),
        body = body,
    )
}

/// Set picker
pub fn home(sets: &[WordSet]) -> String {
    let mut html =
        String::from("<h1>Which set do you want to practice today?</h1><div class=\"set-grid\">");
    for set in sets {
        let _ = write!(
            html,
            "<a class=\"set-tile\" href=\"{}\">{}</a>",
            Route::Practice(set.id).href(),
            escape(&set.name)
        );
    }
    html.push_str("</div>");
    html
}

fn style_class(style: CardStyle) -> &'static str {
    match style {
        CardStyle::Hidden => "card card-hidden",
        CardStyle::Error => "card card-error",
        CardStyle::Selected => "card card-selected",
        CardStyle::Default => "card",
    }
}

/// Game board, progress bar, timer and end-of-game overlay
pub fn practice(set_name: &str, state: &GameState) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<h1>Practice Set {}</h1><section class=\"board\"><h2>Matching Madness</h2>",
        escape(set_name)
    );

    let _ = write!(
        html,
        concat!(
            "<div class=\"progress\"><span class=\"progress-label\">Matches</span>",
            "<span class=\"progress-count\">{}/{}</span>",
            "<div class=\"progress-track\"><div class=\"progress-fill\" style=\"width: {:.0}%\"></div></div>",
            "</div>"
        ),
        state.matches(),
        state.total_pairs(),
        state.progress() * 100.0
    );

    let _ = write!(
        html,
        "<div class=\"cards\" style=\"grid-template-columns: repeat({}, minmax(0, 1fr))\">",
        state.settings().columns
    );
    for (index, card) in state.cards.iter().enumerate() {
        let _ = write!(
            html,
            "<button class=\"{}\" data-action=\"pick\" data-index=\"{}\">{}</button>",
            style_class(card_style(state, index)),
            index,
            escape(&card.content)
        );
    }
    html.push_str("</div>");

    let _ = write!(html, "<p class=\"timer\">Time Left: {}s</p>", state.time_left);

    if state.phase.is_over() {
        let message = if state.phase == GamePhase::GameOverWin {
            "You Win!"
        } else {
            "Game Over!"
        };
        let _ = write!(
            html,
            concat!(
                "<div class=\"overlay\"><div class=\"overlay-box\">",
                "<h2>{}</h2>",
                "<button data-action=\"play-again\">Play Again</button>",
                "<a href=\"{}\">or Practice another set</a>",
                "</div></div>"
            ),
            message,
            Route::Home.href()
        );
    }

    html.push_str("</section>");
    html
}

/// Practice page for a set that has nothing to play yet
pub fn empty_set(set_name: &str, set_id: SetId) -> String {
    format!(
        "<h1>Practice Set {}</h1><p>This set has no words yet. <a href=\"{}\">Add some</a></p>",
        escape(set_name),
        Route::ManageSet(set_id).href()
    )
}

/// Set list, new-set form and (optionally) the word editor
pub fn manage(sets: &SetManager, editor: Option<&WordEditor>) -> String {
    let mut html = String::from("<h1>Manage Sets</h1>");
    let _ = write!(
        html,
        concat!(
            "<form data-form=\"add-set\" class=\"row\">",
            "<input type=\"text\" name=\"setName\" placeholder=\"Set Name\" data-field=\"set-name\" value=\"{}\">",
            "<button type=\"submit\">Add Set</button>",
            "</form>"
        ),
        escape(&sets.new_set_name)
    );

    html.push_str("<div class=\"manage\"><ul class=\"set-list\">");
    for set in &sets.sets {
        let _ = write!(
            html,
            concat!(
                "<li><a href=\"{}\">{}</a>",
                "<button class=\"danger\" data-action=\"delete-set\" data-id=\"{}\">Delete</button></li>"
            ),
            Route::ManageSet(set.id).href(),
            escape(&set.name),
            set.id
        );
    }
    html.push_str("</ul>");

    if let Some(editor) = editor {
        html.push_str(&word_editor(editor));
    }
    html.push_str("</div>");
    html
}

fn word_editor(editor: &WordEditor) -> String {
    let mut html = String::from("<section class=\"word-editor\"><h2>Manage Words in Set</h2>");
    let _ = write!(
        html,
        concat!(
            "<form data-form=\"save-word\" class=\"row\">",
            "<input type=\"text\" name=\"word\" placeholder=\"Word\" data-field=\"word\" value=\"{}\">",
            "<input type=\"text\" name=\"translation\" placeholder=\"Translation\" data-field=\"translation\" value=\"{}\">",
            "<button type=\"submit\">{}</button>"
        ),
        escape(&editor.word_input),
        escape(&editor.translation_input),
        editor.submit_label()
    );
    if editor.is_editing() {
        html.push_str("<button type=\"button\" data-action=\"cancel-edit\">Cancel</button>");
    }
    html.push_str("</form><ul class=\"word-list\">");

    for word in &editor.words {
        let _ = write!(
            html,
            concat!(
                "<li><span>{} - {}</span>",
                "<button data-action=\"edit-word\" data-id=\"{id}\">Edit</button>",
                "<button class=\"danger\" data-action=\"delete-word\" data-id=\"{id}\">Delete</button></li>"
            ),
            escape(&word.word),
            escape(&word.translation),
            id = word.id
        );
    }
    html.push_str("</ul></section>");
    html
}

pub fn loading() -> String {
    "<p>Loading ...</p>".to_string()
}

pub fn not_found(path: &str) -> String {
    format!(
        "<h1>Page not found</h1><p>Nothing lives at <code>{}</code>. <a href=\"{}\">Go home</a></p>",
        escape(path),
        Route::Home.href()
    )
}

/// Visible failure page
pub fn error(message: &str) -> String {
    format!(
        "<h1>Something went wrong</h1><pre class=\"error\">{}</pre>",
        escape(message)
    )
}
