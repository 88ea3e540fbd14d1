//! Surfaces the preview flow reads from and writes to.
//!
//! The code editor and the surrounding page are owned by whoever hosts the
//! client. They are reached through these traits so the flow can be driven by
//! a browser binding, a terminal front end, or the in-memory doubles in
//! [`crate::infra::surfaces`].

use jamdesk_api_types::Annotation;

/// Text buffer plus margin annotation sink.
pub trait EditorSurface: Send + Sync {
    /// Full editor contents at call time.
    fn text(&self) -> String;

    /// Replace every annotation currently shown in the margin.
    fn set_annotations(&self, annotations: Vec<Annotation>);

    fn clear_annotations(&self) {
        self.set_annotations(Vec::new());
    }
}

/// Title field, submit control and preview container of the editor page.
pub trait PageSurface: Send + Sync {
    fn title(&self) -> String;

    fn set_submit_disabled(&self, disabled: bool);

    /// Replace the preview container's markup.
    fn set_preview_html(&self, html: String);
}
