use chrono::{SecondsFormat, Utc};

use crate::app::model::{Favorites, Summary, seed_catalog};
use crate::app::store::{
    ADMIN_SESSION_KEY, BOOKS_KEY, FAVORITES_KEY, KeyValueStore, load, save,
};
use crate::route::Route;
use crate::router::Router;

/// The fixed admin secret.
///
/// Compared in cleartext and visible to anyone holding the binary. It gates the
/// admin pages of this catalog and nothing else; it is not a security boundary.
pub const ADMIN_PASSWORD: &str = "admin123";

/// Sole owner of the catalog, the favorites and the admin session.
pub struct App {
    store: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
    router: Router,
    books: Vec<Summary>,
    favorites: Favorites,
    is_admin: bool,
    pending_query: Option<String>,
}

impl App {
    /// Loads persisted state; unreadable slots fall back to the seed catalog / no favorites.
    pub fn new(
        store: Box<dyn KeyValueStore>,
        session: Box<dyn KeyValueStore>,
        router: Router,
    ) -> Self {
        let books = load(store.as_ref(), BOOKS_KEY, seed_catalog());
        let favorites = load(store.as_ref(), FAVORITES_KEY, Favorites::default());
        let is_admin = matches!(session.get(ADMIN_SESSION_KEY), Ok(Some(flag)) if flag == "true");
        tracing::debug!(
            books = books.len(),
            favorites = favorites.len(),
            is_admin,
            "loaded state"
        );

        Self {
            store,
            session,
            router,
            books,
            favorites,
            is_admin,
            pending_query: None,
        }
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.books
    }

    pub fn summary(&self, id: &str) -> Option<&Summary> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn route(&self) -> &Route {
        self.router.current()
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn navigate(&mut self, route: &Route) {
        self.router.navigate(route);
    }

    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = self.favorites.toggle(id);
        save(self.store.as_mut(), FAVORITES_KEY, &self.favorites);
        now_favorite
    }

    /// A fresh, timestamp-derived id that no current record uses.
    pub fn next_id(&self) -> String {
        let base = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        if self.summary(&base).is_none() {
            return base;
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.summary(candidate).is_none())
            .unwrap_or(base)
    }

    /// Replaces the record with the same id, or appends it. Then shows the catalog.
    pub fn save_summary(&mut self, summary: Summary) {
        match self.books.iter_mut().find(|book| book.id == summary.id) {
            Some(existing) => {
                tracing::info!(id = %summary.id, "replace summary");
                *existing = summary;
            }
            None => {
                tracing::info!(id = %summary.id, "add summary");
                self.books.push(summary);
            }
        }
        save(self.store.as_mut(), BOOKS_KEY, &self.books);
        self.router.navigate(&Route::Browse);
    }

    /// Removes the record and its favorite entry. Callers confirm beforehand.
    pub fn delete_summary(&mut self, id: &str) {
        let before = self.books.len();
        self.books.retain(|book| book.id != id);
        tracing::info!(id, removed = before != self.books.len(), "delete summary");
        save(self.store.as_mut(), BOOKS_KEY, &self.books);

        if self.favorites.remove(id) {
            save(self.store.as_mut(), FAVORITES_KEY, &self.favorites);
        }
        self.router.navigate(&Route::Browse);
    }

    pub fn login(&mut self, password: &str) -> bool {
        if password != ADMIN_PASSWORD {
            return false;
        }
        if let Err(err) = self.session.set(ADMIN_SESSION_KEY, "true") {
            tracing::error!(?err, "persist admin session");
        }
        self.is_admin = true;
        self.router.navigate(&Route::Home);
        true
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.session.remove(ADMIN_SESSION_KEY) {
            tracing::error!(?err, "clear admin session");
        }
        self.is_admin = false;
        self.router.navigate(&Route::Home);
    }

    /// Hands `query` to the browse page and opens it.
    pub fn search_from_home(&mut self, query: &str) {
        self.pending_query = Some(query.to_owned());
        self.router.navigate(&Route::Browse);
    }

    pub fn take_pending_query(&mut self) -> Option<String> {
        self.pending_query.take()
    }
}
