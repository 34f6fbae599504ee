//! Page routes
//!
//! The static front-end routes on the URL fragment (`#/practice/1`), so
//! `parse` accepts paths with or without a leading `#`.

use crate::store::SetId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Set picker
    Home,
    /// Game over one set
    Practice(SetId),
    /// Set list
    Manage,
    /// Set list plus the word editor for one set
    ManageSet(SetId),
    /// Anything else, kept as a normalized path
    NotFound(String),
}

impl Route {
    pub fn parse(raw: &str) -> Self {
        let path = raw.trim_start_matches('#');
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let unknown = || Route::NotFound(format!("/{}", segments.join("/")));

        match segments.as_slice() {
            [] => Route::Home,
            ["practice", id] => match parse_id(id) {
                Some(id) => Route::Practice(id),
                None => unknown(),
            },
            ["manage"] => Route::Manage,
            ["manage", id] => match parse_id(id) {
                Some(id) => Route::ManageSet(id),
                None => unknown(),
            },
            _ => unknown(),
        }
    }

    /// Path form, e.g. `/practice/3`
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Practice(id) => format!("/practice/{}", id),
            Route::Manage => "/manage".to_string(),
            Route::ManageSet(id) => format!("/manage/{}", id),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Link target for the hash router
    pub fn href(&self) -> String {
        format!("#{}", self.path())
    }
}

fn parse_id(raw: &str) -> Option<SetId> {
    raw.parse::<u32>().ok().map(SetId)
}
