use crate::model::{Candidate, Query, RequestToken};
use crate::view::{Entry, EntryHandle, View};

/// Why a batch of results was not rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// A newer request was issued after this one.
    Superseded,
    /// The input no longer holds the text that produced the results.
    InputChanged,
}

/// Owns the displayed suggestion list and the trigger input's state.
///
/// Every render bumps the generation, which invalidates the handles of the
/// entries it replaced.
pub struct Presenter<V> {
    view: V,
    entries: Vec<Entry>,
    generation: u64,
    latest: RequestToken,
    input: String,
}

impl<V: View> Presenter<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            entries: Vec::new(),
            generation: 0,
            latest: RequestToken::default(),
            input: String::new(),
        }
    }

    /// Records what the user typed. The view already shows it.
    pub fn set_input_value(&mut self, value: &str) {
        self.input = value.to_string();
    }

    pub fn input_value(&self) -> &str {
        &self.input
    }

    /// Issues the token for a new fetch; earlier tokens stop being renderable.
    pub fn begin_request(&mut self) -> RequestToken {
        self.latest = RequestToken(self.latest.0 + 1);
        self.latest
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// Replaces the displayed list with `candidates`, unless the results are stale.
    pub fn render(
        &mut self,
        token: RequestToken,
        query: &Query,
        candidates: Vec<Candidate>,
    ) -> Result<(), Rejection> {
        if token != self.latest {
            return Err(Rejection::Superseded);
        }
        if Query::parse(&self.input).as_ref() != Some(query) {
            return Err(Rejection::InputChanged);
        }
        self.replace(candidates);
        Ok(())
    }

    /// Removes every displayed entry.
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Copies the chosen entry into the form, clears the list and refocuses the input.
    ///
    /// Returns `None` for handles from an earlier render.
    pub fn select(&mut self, handle: EntryHandle) -> Option<Candidate> {
        if handle.generation != self.generation {
            return None;
        }
        let candidate = self.entries.get(handle.index)?.candidate.clone();

        self.input = candidate.label.clone();
        self.view.set_input(&candidate.label);
        if let Some((lat, lon)) = candidate.coordinates() {
            self.view.set_coordinates(lat, lon);
        }
        self.clear();
        self.view.focus_input();
        Some(candidate)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn replace(&mut self, candidates: Vec<Candidate>) {
        self.generation += 1;
        let generation = self.generation;
        self.entries = candidates
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| Entry {
                handle: EntryHandle { generation, index },
                candidate,
            })
            .collect();
        self.view.show_entries(&self.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::HtmlView;

    fn query(text: &str) -> Query {
        Query::parse(text).unwrap()
    }

    fn typed(presenter: &mut Presenter<HtmlView>, text: &str) -> RequestToken {
        presenter.set_input_value(text);
        presenter.begin_request()
    }

    #[test]
    fn test_render_and_select() {
        let mut presenter = Presenter::new(HtmlView::default());
        let token = typed(&mut presenter, "Par");

        presenter
            .render(token, &query("Par"), vec![Candidate::labelled("Paris")])
            .unwrap();
        assert_eq!(presenter.entries().len(), 1);
        assert!(presenter.view().markup.contains("data-text=\"Paris\""));

        let handle = presenter.entries()[0].handle;
        let selected = presenter.select(handle).unwrap();
        assert_eq!(selected.label, "Paris");
        assert_eq!(presenter.view().input, "Paris");
        assert_eq!(presenter.input_value(), "Paris");
        assert!(presenter.view().focused);
        assert!(presenter.entries().is_empty());
        assert_eq!(presenter.view().markup, "");
    }

    #[test]
    fn test_select_fills_coordinates() {
        let mut presenter = Presenter::new(HtmlView::default());
        let token = typed(&mut presenter, "kath");
        let candidate = Candidate::labelled("Kathmandu, Nepal").with_coordinates(27.7, 85.3);
        presenter.render(token, &query("kath"), vec![candidate]).unwrap();

        let handle = presenter.entries()[0].handle;
        presenter.select(handle).unwrap();
        assert_eq!(presenter.view().latitude, Some(27.7));
        assert_eq!(presenter.view().longitude, Some(85.3));
    }

    #[test]
    fn test_superseded_token_is_rejected() {
        let mut presenter = Presenter::new(HtmlView::default());
        let first = typed(&mut presenter, "par");
        let second = typed(&mut presenter, "pari");

        presenter
            .render(second, &query("pari"), vec![Candidate::labelled("Paris")])
            .unwrap();
        let stale = presenter.render(first, &query("par"), vec![Candidate::labelled("Parma")]);
        assert_eq!(stale, Err(Rejection::Superseded));
        assert_eq!(presenter.entries()[0].candidate.label, "Paris");
    }

    #[test]
    fn test_changed_input_is_rejected() {
        let mut presenter = Presenter::new(HtmlView::default());
        let token = typed(&mut presenter, "par");
        presenter.set_input_value("pa");

        let result = presenter.render(token, &query("par"), vec![Candidate::labelled("Paris")]);
        assert_eq!(result, Err(Rejection::InputChanged));
        assert!(presenter.entries().is_empty());
    }

    #[test]
    fn test_empty_render_clears_previous_entries() {
        let mut presenter = Presenter::new(HtmlView::default());
        let token = typed(&mut presenter, "pa");
        presenter
            .render(token, &query("pa"), vec![Candidate::labelled("Patan")])
            .unwrap();

        let token = typed(&mut presenter, "pax");
        presenter.render(token, &query("pax"), Vec::new()).unwrap();
        assert!(presenter.entries().is_empty());
        assert_eq!(presenter.view().markup, "");
    }

    #[test]
    fn test_handles_from_earlier_render_are_dead() {
        let mut presenter = Presenter::new(HtmlView::default());
        let token = typed(&mut presenter, "pa");
        presenter
            .render(token, &query("pa"), vec![Candidate::labelled("Patan")])
            .unwrap();
        let old = presenter.entries()[0].handle;

        let token = typed(&mut presenter, "pat");
        presenter
            .render(token, &query("pat"), vec![Candidate::labelled("Patan")])
            .unwrap();

        assert!(presenter.select(old).is_none());
        let fresh = presenter.entries()[0].handle;
        assert_eq!(fresh.index(), 0);
        assert!(presenter.select(fresh).is_some());
    }
}
