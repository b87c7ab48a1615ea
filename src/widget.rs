use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::config::SuggestConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::fetch::{Geocoder, LocalIndex, RemoteSearch, SuggestionFetcher};
use crate::logs::{send_log, LogSender};
use crate::model::{Candidate, Query};
use crate::presenter::{Presenter, Rejection};
use crate::view::{Entry, EntryHandle, View};

/// One suggestion box on the page: its own debouncer, backend and presenter.
///
/// Cloning yields another handle to the same widget.
pub struct SuggestWidget<F, V> {
    inner: Arc<Inner<F, V>>,
}

struct Inner<F, V> {
    name: String,
    fetcher: F,
    presenter: Mutex<Presenter<V>>,
    debouncer: Debouncer,
    delay: Duration,
    log: Option<LogSender>,
}

impl<F, V> Clone for SuggestWidget<F, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V: View> SuggestWidget<Geocoder, V> {
    /// Place autocomplete backed by the geocoding API.
    pub fn location(config: &SuggestConfig, view: V, log: Option<LogSender>) -> Result<Self> {
        let geocoder = Geocoder::new(
            config.http_client()?,
            config.geocode_endpoint.clone(),
            config.geocode_api_key.clone(),
        );
        Ok(Self::new("location", geocoder, view, config.location_delay(), log))
    }
}

impl<V: View> SuggestWidget<RemoteSearch, V> {
    /// Location search ranked by the server.
    pub fn search(config: &SuggestConfig, view: V, log: Option<LogSender>) -> Result<Self> {
        let search = RemoteSearch::new(config.http_client()?, config.search_endpoint.clone());
        Ok(Self::new("search", search, view, config.search_delay(), log))
    }
}

impl<V: View> SuggestWidget<LocalIndex, V> {
    /// Location search ranked in memory. Starts the corpus download immediately.
    pub fn local_search(config: &SuggestConfig, view: V, log: Option<LogSender>) -> Result<Self> {
        let index = LocalIndex::load(
            config.http_client()?,
            config.corpus_endpoint.clone(),
            config.local_limit,
            log.clone(),
        );
        Ok(Self::new("local", index, view, config.search_delay(), log))
    }
}

impl<F: SuggestionFetcher, V: View> SuggestWidget<F, V> {
    pub fn new(
        name: impl Into<String>,
        fetcher: F,
        view: V,
        delay: Duration,
        log: Option<LogSender>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                fetcher,
                presenter: Mutex::new(Presenter::new(view)),
                debouncer: Debouncer::new(),
                delay,
                log,
            }),
        }
    }

    /// Keystroke handler: records the input and schedules a debounced refresh.
    ///
    /// The refresh reads the input when the timer fires, not the text passed here.
    /// The timer only holds a weak reference, so dropping every handle cancels it.
    pub async fn on_input(&self, value: &str) {
        self.inner.presenter.lock().await.set_input_value(value);

        let inner: Weak<Inner<F, V>> = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(self.inner.delay, async move {
            if let Some(inner) = inner.upgrade() {
                SuggestWidget { inner }.refresh_current().await;
            }
        });
    }

    /// Sets the input to `value` and queries the backend for it right away.
    ///
    /// Empty input clears the list without fetching. Fetch errors are logged and
    /// leave the displayed list as it was.
    pub async fn refresh(&self, value: &str) {
        self.inner.presenter.lock().await.set_input_value(value);
        self.refresh_current().await;
    }

    /// Fetches for whatever the input holds now and renders the answer if it is still current.
    async fn refresh_current(&self) {
        let (token, query) = {
            let mut presenter = self.inner.presenter.lock().await;
            let Some(query) = Query::parse(presenter.input_value()) else {
                presenter.begin_request();
                presenter.clear();
                return;
            };
            (presenter.begin_request(), query)
        };

        let candidates = match self.inner.fetcher.fetch(&query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                self.log(
                    "fetch",
                    &format!("{}: query \"{query}\" failed: {e}", e.kind().as_str()),
                );
                return;
            }
        };

        let count = candidates.len();
        let rendered = self
            .inner
            .presenter
            .lock()
            .await
            .render(token, &query, candidates);
        match rendered {
            Ok(()) => {}
            Err(Rejection::Superseded) => self.log(
                "render",
                &format!("Dropped {count} result(s) for \"{query}\": newer request pending"),
            ),
            Err(Rejection::InputChanged) => self.log(
                "render",
                &format!("Dropped {count} result(s) for \"{query}\": input changed"),
            ),
        }
    }

    /// Applies a click on a displayed entry. `None` if the entry is no longer shown.
    ///
    /// A successful selection also drops the pending debounced refresh, which
    /// belonged to the text the label just replaced.
    pub async fn select(&self, handle: EntryHandle) -> Option<Candidate> {
        let selected = self.inner.presenter.lock().await.select(handle);
        if let Some(ref candidate) = selected {
            self.inner.debouncer.cancel();
            self.log("select", &candidate.label);
        }
        selected
    }

    /// Abandons a pending debounced refresh. Requests already in flight still complete.
    pub fn cancel_pending(&self) {
        self.inner.debouncer.cancel();
    }

    pub fn has_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    pub async fn entries(&self) -> Vec<Entry> {
        self.inner.presenter.lock().await.entries().to_vec()
    }

    pub async fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(self.inner.presenter.lock().await.view())
    }

    pub fn fetcher(&self) -> &F {
        &self.inner.fetcher
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    fn log(&self, prefix: &str, line: &str) {
        if let Some(ref tx) = self.inner.log {
            send_log(tx, prefix, &format!("{}: {line}", self.inner.name));
        }
    }
}
