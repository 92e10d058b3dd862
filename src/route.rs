use std::fmt;

/// Where the user currently is. Derived from the URL fragment and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Browse,
    Book { id: String },
    /// Create (`id: None`) or edit form.
    Form { id: Option<String> },
    Admin,
    Favorites,
    Dashboard,
}

/// Parses fragment text. Anything unrecognised lands on [`Route::Home`].
pub fn decode(fragment: &str) -> Route {
    let path = fragment.strip_prefix('#').unwrap_or(fragment);
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut parts = path.split('/');
    let head = parts.next().unwrap_or_default();
    let id = parts.next().filter(|id| !id.is_empty()).map(str::to_owned);

    match (head, id) {
        ("book", Some(id)) => Route::Book { id },
        ("edit", Some(id)) => Route::Form { id: Some(id) },
        ("new", _) => Route::Form { id: None },
        ("browse", _) => Route::Browse,
        ("admin", _) => Route::Admin,
        ("favorites", _) => Route::Favorites,
        ("dashboard", _) => Route::Dashboard,
        _ => Route::Home,
    }
}

/// Inverse of [`decode`]. The result carries no leading `#`.
pub fn encode(route: &Route) -> String {
    match route {
        Route::Home => "home".to_owned(),
        Route::Browse => "browse".to_owned(),
        Route::Book { id } => format!("book/{id}"),
        Route::Form { id: Some(id) } => format!("edit/{id}"),
        Route::Form { id: None } => "new".to_owned(),
        Route::Admin => "admin".to_owned(),
        Route::Favorites => "favorites".to_owned(),
        Route::Dashboard => "dashboard".to_owned(),
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", encode(self))
    }
}
