//! Set and word management forms
//!
//! Form state for the `/manage` pages. Every mutation goes straight to the
//! store and is followed by a full re-fetch of the affected list; nothing
//! is updated optimistically.

use crate::platform::StorageBackend;
use crate::store::{Result, SetId, Store, Word, WordId, WordSet};

/// The set list with its "new set" form
#[derive(Debug, Clone, Default)]
pub struct SetManager {
    pub sets: Vec<WordSet>,
    pub new_set_name: String,
}

impl SetManager {
    pub fn load<B: StorageBackend>(store: &Store<B>) -> Self {
        Self {
            sets: store.all_sets(),
            new_set_name: String::new(),
        }
    }

    pub fn refresh<B: StorageBackend>(&mut self, store: &Store<B>) {
        self.sets = store.all_sets();
    }

    /// Add a set from the name field. Blank names are ignored.
    pub fn submit<B: StorageBackend>(&mut self, store: &mut Store<B>) -> Result<Option<WordSet>> {
        let name = self.new_set_name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let set = store.add_set(name)?;
        self.new_set_name.clear();
        self.refresh(store);
        Ok(Some(set))
    }

    /// Delete a set. Its words are left in the store.
    pub fn delete<B: StorageBackend>(&mut self, store: &mut Store<B>, id: SetId) -> Result<()> {
        store.delete_set(id)?;
        self.refresh(store);
        Ok(())
    }
}

/// The word list of one set with its add/update form
#[derive(Debug, Clone)]
pub struct WordEditor {
    pub set_id: SetId,
    pub words: Vec<Word>,
    pub word_input: String,
    pub translation_input: String,
    /// Set while the form edits an existing word
    pub editing: Option<WordId>,
}

impl WordEditor {
    pub fn load<B: StorageBackend>(store: &Store<B>, set_id: SetId) -> Self {
        Self {
            set_id,
            words: store.words_by_set(set_id),
            word_input: String::new(),
            translation_input: String::new(),
            editing: None,
        }
    }

    pub fn refresh<B: StorageBackend>(&mut self, store: &Store<B>) {
        self.words = store.words_by_set(self.set_id);
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Label for the form's submit button
    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Word"
        } else {
            "Add Word"
        }
    }

    /// Load `word` into the form; the next submit updates it
    pub fn begin_edit(&mut self, word: &Word) {
        self.editing = Some(word.id);
        self.word_input = word.word.clone();
        self.translation_input = word.translation.clone();
    }

    /// `begin_edit` by id, reading the word from the store
    pub fn begin_edit_id<B: StorageBackend>(&mut self, store: &Store<B>, id: WordId) -> Result<()> {
        let word = store.word(id)?;
        self.begin_edit(&word);
        Ok(())
    }

    /// Leave edit mode and clear the fields
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.clear_fields();
    }

    /// Add a new word, or update the one being edited.
    /// Ignored while either field is blank.
    pub fn submit<B: StorageBackend>(&mut self, store: &mut Store<B>) -> Result<Option<Word>> {
        let word = self.word_input.trim();
        let translation = self.translation_input.trim();
        if word.is_empty() || translation.is_empty() {
            return Ok(None);
        }

        let saved = match self.editing.take() {
            Some(id) => {
                let updated = Word {
                    id,
                    set_id: self.set_id,
                    word: word.to_string(),
                    translation: translation.to_string(),
                };
                store.update_word(&updated)?;
                updated
            }
            None => store.add_word(self.set_id, word, translation)?,
        };

        self.clear_fields();
        self.refresh(store);
        Ok(Some(saved))
    }

    /// Delete a word; deleting the one being edited also resets the form
    pub fn delete<B: StorageBackend>(&mut self, store: &mut Store<B>, id: WordId) -> Result<()> {
        store.delete_word(id)?;
        if self.editing == Some(id) {
            self.cancel_edit();
        }
        self.refresh(store);
        Ok(())
    }

    fn clear_fields(&mut self) {
        self.word_input.clear();
        self.translation_input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryBackend;

    fn store() -> Store<MemoryBackend> {
        Store::open(MemoryBackend::new()).unwrap()
    }

    #[test]
    fn test_set_manager_add_and_delete() {
        let mut store = store();
        let mut manager = SetManager::load(&store);
        assert!(manager.sets.is_empty());

        manager.new_set_name = "  Verbs ".to_string();
        let set = manager.submit(&mut store).unwrap().unwrap();
        assert_eq!(set.name, "Verbs");
        assert!(manager.new_set_name.is_empty());
        assert_eq!(manager.sets, vec![set.clone()]);

        manager.delete(&mut store, set.id).unwrap();
        assert!(manager.sets.is_empty());
    }

    #[test]
    fn test_set_manager_ignores_blank_name() {
        let mut store = store();
        let mut manager = SetManager::load(&store);
        manager.new_set_name = "   ".to_string();
        assert!(manager.submit(&mut store).unwrap().is_none());
        assert!(store.all_sets().is_empty());
    }

    #[test]
    fn test_word_editor_add() {
        let mut store = store();
        let set = store.add_set("Food").unwrap();
        let mut editor = WordEditor::load(&store, set.id);
        assert_eq!(editor.submit_label(), "Add Word");

        editor.word_input = "ぶどう".to_string();
        editor.translation_input = "grapes".to_string();
        let word = editor.submit(&mut store).unwrap().unwrap();

        assert_eq!(word.set_id, set.id);
        assert_eq!(editor.words, vec![word]);
        assert!(editor.word_input.is_empty());
        assert!(editor.translation_input.is_empty());
    }

    #[test]
    fn test_word_editor_edit_then_update() {
        let mut store = store();
        let set = store.add_set("Food").unwrap();
        let word = store.add_word(set.id, "ぶどう", "grape").unwrap();
        let mut editor = WordEditor::load(&store, set.id);

        editor.begin_edit_id(&store, word.id).unwrap();
        assert!(editor.is_editing());
        assert_eq!(editor.submit_label(), "Update Word");
        assert_eq!(editor.word_input, "ぶどう");
        assert_eq!(editor.translation_input, "grape");

        editor.translation_input = "grapes".to_string();
        let saved = editor.submit(&mut store).unwrap().unwrap();
        assert_eq!(saved.id, word.id);
        assert!(!editor.is_editing());
        assert_eq!(store.word(word.id).unwrap().translation, "grapes");
        assert_eq!(editor.words.len(), 1);
    }

    #[test]
    fn test_word_editor_cancel_clears_form() {
        let mut store = store();
        let set = store.add_set("Food").unwrap();
        let word = store.add_word(set.id, "血", "blood").unwrap();
        let mut editor = WordEditor::load(&store, set.id);

        editor.begin_edit(&word);
        editor.cancel_edit();
        assert_eq!(editor.editing, None);
        assert!(editor.word_input.is_empty());
        assert!(editor.translation_input.is_empty());

        // Next submit adds instead of updating
        editor.word_input = "文化".to_string();
        editor.translation_input = "culture".to_string();
        let added = editor.submit(&mut store).unwrap().unwrap();
        assert_ne!(added.id, word.id);
        assert_eq!(editor.words.len(), 2);
    }

    #[test]
    fn test_word_editor_blank_fields_ignored() {
        let mut store = store();
        let set = store.add_set("Food").unwrap();
        let mut editor = WordEditor::load(&store, set.id);
        editor.word_input = "貿易".to_string();
        assert!(editor.submit(&mut store).unwrap().is_none());
        assert_eq!(editor.word_input, "貿易");
        assert!(store.words_by_set(set.id).is_empty());
    }

    #[test]
    fn test_word_editor_delete_edited_word_resets_form() {
        let mut store = store();
        let set = store.add_set("Food").unwrap();
        let word = store.add_word(set.id, "血", "blood").unwrap();
        let mut editor = WordEditor::load(&store, set.id);

        editor.begin_edit(&word);
        editor.delete(&mut store, word.id).unwrap();
        assert!(!editor.is_editing());
        assert!(editor.words.is_empty());
    }

    #[test]
    fn test_begin_edit_missing_word() {
        let store = store();
        let mut editor = WordEditor::load(&store, SetId(1));
        assert!(editor.begin_edit_id(&store, WordId(5)).is_err());
        assert!(!editor.is_editing());
    }
}
