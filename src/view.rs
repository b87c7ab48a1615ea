//! The page-side collaborator a widget renders into.

use crate::model::Candidate;
use crate::templates;

/// Identifies one displayed entry. Only valid for the render that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    pub(crate) generation: u64,
    pub(crate) index: usize,
}

impl EntryHandle {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub handle: EntryHandle,
    pub candidate: Candidate,
}

/// Trigger input plus results container, as seen by the presenter.
pub trait View: Send + 'static {
    /// Replace every displayed entry. An empty slice clears the container.
    fn show_entries(&mut self, entries: &[Entry]);
    fn set_input(&mut self, value: &str);
    fn set_coordinates(&mut self, latitude: f64, longitude: f64);
    fn focus_input(&mut self);
}

/// In-memory page: keeps the rendered list markup and the form field values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HtmlView {
    pub markup: String,
    pub input: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub focused: bool,
}

impl View for HtmlView {
    fn show_entries(&mut self, entries: &[Entry]) {
        let candidates: Vec<Candidate> = entries.iter().map(|e| e.candidate.clone()).collect();
        self.markup = templates::result_list(&candidates);
    }

    fn set_input(&mut self, value: &str) {
        self.input = value.to_string();
    }

    fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
    }

    fn focus_input(&mut self) {
        self.focused = true;
    }
}
