use sikum::app::App;
use sikum::app::model::Summary;
use sikum::app::store::{
    ADMIN_SESSION_KEY, BOOKS_KEY, FAVORITES_KEY, KeyValueStore, MemoryStore,
};
use sikum::route::Route;
use sikum::router::{MemoryHistory, Router};

/// A store handle the test can inspect after handing a box of it to the app.
#[derive(Clone, Default)]
struct SharedStore(std::rc::Rc<std::cell::RefCell<MemoryStore>>);

impl SharedStore {
    fn with_quota(bytes: usize) -> Self {
        Self(std::rc::Rc::new(std::cell::RefCell::new(
            MemoryStore::with_quota(bytes),
        )))
    }

    fn raw(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).unwrap()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.0.borrow_mut().remove(key)
    }
}

fn open(store: &SharedStore, session: &SharedStore) -> App {
    App::new(
        Box::new(store.clone()),
        Box::new(session.clone()),
        Router::new(Box::new(MemoryHistory::default())),
    )
}

fn summary(id: &str, reading_time: u32) -> Summary {
    Summary {
        id: id.to_owned(),
        title: format!("Book {id}"),
        author: "Author".to_owned(),
        genre: "Genre".to_owned(),
        summary: "Text.".to_owned(),
        reading_time,
        is_recommended: false,
        cover_image: None,
    }
}

fn favorite_ids(app: &App) -> Vec<String> {
    let mut ids: Vec<String> = app.favorites().iter().map(str::to_owned).collect();
    ids.sort();
    ids
}

#[test]
fn toggle_favorite_twice_restores_and_persists() {
    let store = SharedStore::default();
    let session = SharedStore::default();
    let mut app = open(&store, &session);

    app.toggle_favorite("1");
    let before = favorite_ids(&app);

    assert!(app.toggle_favorite("4"));
    assert!(!app.toggle_favorite("4"));
    assert_eq!(favorite_ids(&app), before);
    assert_eq!(store.raw(FAVORITES_KEY).as_deref(), Some(r#"["1"]"#));

    // No existence check: unknown ids toggle too.
    assert!(app.toggle_favorite("ghost"));
    assert!(app.is_favorite("ghost"));
}

#[test]
fn delete_cascades_into_favorites() {
    let store = SharedStore::default();
    let session = SharedStore::default();
    let mut app = open(&store, &session);
    app.toggle_favorite("2");
    app.toggle_favorite("3");

    app.delete_summary("2");

    assert!(app.summary("2").is_none());
    assert_eq!(app.summaries().len(), 4);
    assert_eq!(favorite_ids(&app), vec!["3".to_owned()]);
    assert_eq!(app.route(), &Route::Browse);

    let stored: Vec<Summary> = serde_json::from_str(&store.raw(BOOKS_KEY).unwrap()).unwrap();
    assert!(stored.iter().all(|book| book.id != "2"));
    assert_eq!(store.raw(FAVORITES_KEY).as_deref(), Some(r#"["3"]"#));
}

#[test]
fn delete_of_non_favorite_leaves_favorites_alone() {
    let store = SharedStore::default();
    let session = SharedStore::default();
    let mut app = open(&store, &session);
    app.toggle_favorite("1");

    app.delete_summary("5");

    assert_eq!(favorite_ids(&app), vec!["1".to_owned()]);
    assert!(app.summary("5").is_none());
}

#[test]
fn save_replaces_existing_id_in_place_and_appends_new_ids() {
    let store = SharedStore::default();
    let session = SharedStore::default();
    let mut app = open(&store, &session);
    let size = app.summaries().len();

    let mut edited = app.summary("3").unwrap().clone();
    edited.title = "Sapiens".to_owned();
    app.save_summary(edited);
    assert_eq!(app.summaries().len(), size);
    assert_eq!(app.summaries()[2].title, "Sapiens");

    let id = app.next_id();
    app.save_summary(summary(&id, 9));
    assert_eq!(app.summaries().len(), size + 1);
    assert_eq!(app.route(), &Route::Browse);

    let reopened = open(&store, &SharedStore::default());
    assert_eq!(reopened.summaries().len(), size + 1);
    assert_eq!(reopened.summary("3").unwrap().title, "Sapiens");
}

#[test]
fn sequential_ids_do_not_collide() {
    let store = SharedStore::default();
    let session = SharedStore::default();
    let mut app = open(&store, &session);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..20 {
        let id = app.next_id();
        assert!(seen.insert(id.clone()), "duplicate id {id}");
        app.save_summary(summary(&id, 5));
    }
    assert_eq!(app.summaries().len(), 25);
}

#[test]
fn average_reading_time_scenario() {
    let store = SharedStore::default();
    let mut raw = store.clone();
    let books = vec![summary("1", 8), summary("2", 18)];
    raw.set(BOOKS_KEY, &serde_json::to_string(&books).unwrap())
        .unwrap();

    let app = open(&store, &SharedStore::default());
    let stats = sikum::app::catalog::stats(app.summaries());
    assert_eq!(stats.total, 2);
    assert_eq!(stats.average_reading_time, 13);
}

#[test]
fn wrong_password_changes_nothing() {
    let store = SharedStore::default();
    let session = SharedStore::default();
    let mut app = open(&store, &session);
    app.navigate(&Route::Admin);

    assert!(!app.login("hunter2"));
    assert!(!app.is_admin());
    assert_eq!(app.route(), &Route::Admin);
    assert_eq!(session.raw(ADMIN_SESSION_KEY), None);
}

#[test]
fn correct_password_sets_session_and_goes_home() {
    let store = SharedStore::default();
    let session = SharedStore::default();
    let mut app = open(&store, &session);
    app.navigate(&Route::Admin);

    assert!(app.login(sikum::app::shell::ADMIN_PASSWORD));
    assert!(app.is_admin());
    assert_eq!(app.route(), &Route::Home);
    assert_eq!(session.raw(ADMIN_SESSION_KEY).as_deref(), Some("true"));

    // A second app sharing the session store is logged in too.
    assert!(open(&store, &session).is_admin());

    app.navigate(&Route::Dashboard);
    app.logout();
    assert!(!app.is_admin());
    assert_eq!(app.route(), &Route::Home);
    assert_eq!(session.raw(ADMIN_SESSION_KEY), None);
}

#[test]
fn failed_writes_keep_in_memory_state() {
    let store = SharedStore::with_quota(64);
    let session = SharedStore::default();
    let mut app = open(&store, &session);

    let id = app.next_id();
    app.save_summary(summary(&id, 3));
    app.toggle_favorite(&id);

    assert_eq!(app.summaries().len(), 6);
    assert!(app.is_favorite(&id));
    assert_eq!(store.raw(BOOKS_KEY), None);
}

#[test]
fn corrupt_storage_falls_back_to_defaults() {
    let store = SharedStore::default();
    let mut raw = store.clone();
    raw.set(BOOKS_KEY, "{\"oops\":").unwrap();
    raw.set(FAVORITES_KEY, "42").unwrap();

    let app = open(&store, &SharedStore::default());
    assert_eq!(app.summaries().len(), 5);
    assert!(app.favorites().is_empty());
}
