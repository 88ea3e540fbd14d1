//! In-memory editor page used by the command-line front end and tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use jamdesk_api_types::Annotation;
use serde::Serialize;

use crate::domain::surfaces::{EditorSurface, PageSurface};

#[derive(Debug, Default)]
pub struct MemoryEditor {
    text: Mutex<String>,
    annotations: Mutex<Vec<Annotation>>,
}

impl MemoryEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(text.into()),
            annotations: Mutex::new(Vec::new()),
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *lock(&self.text) = text.into();
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        lock(&self.annotations).clone()
    }
}

impl EditorSurface for MemoryEditor {
    fn text(&self) -> String {
        lock(&self.text).clone()
    }

    fn set_annotations(&self, annotations: Vec<Annotation>) {
        *lock(&self.annotations) = annotations;
    }
}

/// Observable state of a [`MemoryPage`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub title: String,
    pub submit_disabled: bool,
    pub preview_html: String,
}

#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageState>,
}

impl MemoryPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(PageState {
                title: title.into(),
                ..PageState::default()
            }),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        lock(&self.state).title = title.into();
    }

    pub fn snapshot(&self) -> PageState {
        lock(&self.state).clone()
    }
}

impl PageSurface for MemoryPage {
    fn title(&self) -> String {
        lock(&self.state).title.clone()
    }

    fn set_submit_disabled(&self, disabled: bool) {
        lock(&self.state).submit_disabled = disabled;
    }

    fn set_preview_html(&self, html: String) {
        lock(&self.state).preview_html = html;
    }
}

// Guarded values are plain data; poisoning carries no broken invariant.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_annotations_empties_the_sink() {
        let editor = MemoryEditor::new("x");
        editor.set_annotations(vec![Annotation::error(1, "bad")]);
        editor.clear_annotations();
        assert!(editor.annotations().is_empty());
    }

    #[test]
    fn page_snapshot_reflects_writes() {
        let page = MemoryPage::new("Jam");
        page.set_submit_disabled(true);
        page.set_preview_html("<p>hi</p>".into());

        let state = page.snapshot();
        assert_eq!(state.title, "Jam");
        assert!(state.submit_disabled);
        assert_eq!(state.preview_html, "<p>hi</p>");
    }
}
