//! Text rendering of every page.
//!
//! Pages read shell data and never hold on to it. Transient input that belongs
//! to a single page visit (browse filters, the form draft, the login error)
//! lives in [`PageState`] and is rebuilt each time a route is published.

use std::fmt;

use crate::app::App;
use crate::app::catalog::{self, ALL_GENRES, HOME_RECOMMENDED_LIMIT};
use crate::app::form::{Field, SummaryDraft};
use crate::app::model::Summary;
use crate::route::Route;

pub const NOT_FOUND: &str = "ספר לא נמצא.";
pub const NO_PERMISSION: &str = "אין לך הרשאה לגשת לדף זה.";
pub const WRONG_PASSWORD: &str = "סיסמה שגויה";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Idle,
    Browse {
        query: String,
        genre: String,
    },
    Form {
        /// Id of the record being edited; `None` creates a new one.
        editing: Option<String>,
        draft: SummaryDraft,
        error: Option<String>,
    },
    Admin {
        error: Option<String>,
    },
}

impl PageState {
    /// Fresh local state for a page that was just navigated to.
    pub fn mount(app: &mut App, route: &Route) -> Self {
        match route {
            Route::Browse => PageState::Browse {
                query: app.take_pending_query().unwrap_or_default(),
                genre: String::new(),
            },
            Route::Form { id } => {
                let existing = id.as_deref().and_then(|id| app.summary(id));
                PageState::Form {
                    editing: existing.map(|summary| summary.id.clone()),
                    draft: existing.map(SummaryDraft::from).unwrap_or_default(),
                    error: None,
                }
            }
            Route::Admin => PageState::Admin { error: None },
            Route::Home | Route::Book { .. } | Route::Favorites | Route::Dashboard => {
                PageState::Idle
            }
        }
    }
}

/// A full screen: header plus the page selected by the current route.
pub struct Screen<'a> {
    pub app: &'a App,
    pub state: &'a PageState,
}

pub fn render(app: &App, state: &PageState) -> String {
    Screen { app, state }.to_string()
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let app = self.app;
        let route = app.route();
        header(f, app, route)?;
        writeln!(f)?;

        match route {
            Route::Home => home(f, app),
            Route::Browse => {
                let (query, genre) = match self.state {
                    PageState::Browse { query, genre } => (query.as_str(), genre.as_str()),
                    _ => ("", ""),
                };
                browse(f, app, query, genre)
            }
            Route::Book { id } => match app.summary(id) {
                Some(summary) => detail(f, app, summary),
                None => writeln!(f, "{NOT_FOUND}"),
            },
            Route::Form { .. } if !app.is_admin() => writeln!(f, "{NO_PERMISSION}"),
            Route::Form { .. } => match self.state {
                PageState::Form {
                    editing,
                    draft,
                    error,
                } => form(f, editing.is_some(), draft, error.as_deref()),
                _ => form(f, false, &SummaryDraft::default(), None),
            },
            Route::Admin => {
                let error = match self.state {
                    PageState::Admin { error } => error.as_deref(),
                    _ => None,
                };
                admin_login(f, error)
            }
            Route::Favorites => favorites(f, app),
            Route::Dashboard if !app.is_admin() => writeln!(f, "{NO_PERMISSION}"),
            Route::Dashboard => dashboard(f, app),
        }
    }
}

fn header(f: &mut fmt::Formatter<'_>, app: &App, route: &Route) -> fmt::Result {
    let mut links = vec![
        nav_link("דף הבית", &Route::Home, route),
        nav_link("עיון בסיכומים", &Route::Browse, route),
        nav_link("המועדפים שלי", &Route::Favorites, route),
    ];
    if app.is_admin() {
        links.push(nav_link("לוח בקרה", &Route::Dashboard, route));
    }

    writeln!(f, "סיכום 📖   {}", links.join(" | "))?;
    if app.is_admin() {
        writeln!(f, "  הוסף סיכום (new) · התנתק (logout)")?;
    }
    Ok(())
}

fn nav_link(label: &str, target: &Route, current: &Route) -> String {
    if target == current {
        format!("[{label}]")
    } else {
        label.to_owned()
    }
}

fn home(f: &mut fmt::Formatter<'_>, app: &App) -> fmt::Result {
    let books = app.summaries();
    writeln!(f, "פשוט לקרוא חכם")?;
    writeln!(
        f,
        "גלה את התובנות החשובות ביותר מספרים מובילים תוך 10 דקות קריאה בלבד"
    )?;
    writeln!(f, "  חפש ספר או מחבר: search <query>")?;
    writeln!(f)?;
    writeln!(f, "  👑 סיכומים מקצועיים")?;
    writeln!(
        f,
        "  {} דקות קריאה ממוצע",
        catalog::average_reading_time(books)
    )?;
    writeln!(f, "  +{} סיכומי ספרים זמינים", books.len())?;
    writeln!(f)?;
    writeln!(f, "סיכומים מומלצים")?;
    writeln!(f, "הספרים המובילים שזוקקו עבורך לתובנות מפתח.")?;
    grid(f, app, &catalog::recommended(books, HOME_RECOMMENDED_LIMIT))?;
    writeln!(f, "צפה בכל הסיכומים ({})", Route::Browse)
}

fn browse(f: &mut fmt::Formatter<'_>, app: &App, query: &str, genre: &str) -> fmt::Result {
    let books = app.summaries();
    writeln!(f, "עיון בסיכומים")?;
    writeln!(f, "מצא את התובנה הבאה שלך. סנן לפי ז'אנר או חפש לפי כותרת.")?;
    let shown_genre = if genre.is_empty() { ALL_GENRES } else { genre };
    writeln!(f, "  חיפוש: \"{query}\"   ז'אנר: {shown_genre}")?;
    writeln!(f, "  ז'אנרים: {}", catalog::genres(books).join(" | "))?;
    writeln!(f)?;

    let matches = catalog::filter(books, query, Some(genre));
    if matches.is_empty() {
        return writeln!(f, "לא נמצאו סיכומים.");
    }
    grid(f, app, &matches)
}

fn favorites(f: &mut fmt::Formatter<'_>, app: &App) -> fmt::Result {
    writeln!(f, "המועדפים שלי")?;
    let books = catalog::favorite_summaries(app.summaries(), app.favorites());
    if books.is_empty() {
        return writeln!(
            f,
            "עדיין לא הוספת סיכומים למועדפים. חפש סיכומים ולחץ על הכוכב כדי להוסיף אותם לכאן."
        );
    }
    writeln!(
        f,
        "אלו הסיכומים שסימנת לקריאה חוזרת. הם נשמרים רק במחשב הזה."
    )?;
    grid(f, app, &books)
}

fn dashboard(f: &mut fmt::Formatter<'_>, app: &App) -> fmt::Result {
    let stats = catalog::stats(app.summaries());
    writeln!(f, "לוח בקרה")?;
    writeln!(f, "ניתוח נתונים על התוכן באתר.")?;
    writeln!(f, "  סה\"כ סיכומים: {}", stats.total)?;
    writeln!(f, "  זמן קריאה ממוצע: {} דקות", stats.average_reading_time)?;
    writeln!(f, "  סיכומים מומלצים: {}", stats.recommended)?;
    writeln!(f, "  סיכומים לפי ז'אנר:")?;
    for (genre, count) in &stats.per_genre {
        writeln!(f, "    {genre}: {count}")?;
    }
    Ok(())
}

fn detail(f: &mut fmt::Formatter<'_>, app: &App, summary: &Summary) -> fmt::Result {
    if let Some(cover) = &summary.cover_image {
        writeln!(f, "[כריכה: {cover}]")?;
    }
    writeln!(f, "{} {}", summary.title, star(app.is_favorite(&summary.id)))?;
    writeln!(f, "מאת: {}", summary.author)?;
    writeln!(f, "<{}>", summary.genre)?;
    writeln!(f)?;
    writeln!(f, "{}", summary.summary)?;
    if app.is_admin() {
        writeln!(f)?;
        writeln!(
            f,
            "עריכה (edit {id}) · מחיקה (delete {id})",
            id = summary.id
        )?;
    }
    Ok(())
}

fn form(
    f: &mut fmt::Formatter<'_>,
    editing: bool,
    draft: &SummaryDraft,
    error: Option<&str>,
) -> fmt::Result {
    writeln!(f, "{}", if editing { "עריכת סיכום" } else { "סיכום חדש" })?;
    for field in Field::ALL {
        writeln!(f, "  {} [{}]: {}", field.label(), field.name(), draft.value(field))?;
    }
    writeln!(
        f,
        "  מומלץ? [recommended]: {}",
        if draft.is_recommended { "כן" } else { "לא" }
    )?;
    if let Some(error) = error {
        writeln!(f, "  שגיאה: {error}")?;
    }
    writeln!(f, "שמור (submit) · ביטול (cancel)")
}

fn admin_login(f: &mut fmt::Formatter<'_>, error: Option<&str>) -> fmt::Result {
    writeln!(f, "כניסת מנהל")?;
    writeln!(f, "  סיסמה: login <password>")?;
    if let Some(error) = error {
        writeln!(f, "  {error}")?;
    }
    Ok(())
}

fn grid(f: &mut fmt::Formatter<'_>, app: &App, books: &[&Summary]) -> fmt::Result {
    for book in books {
        card(f, book, app.is_favorite(&book.id))?;
    }
    Ok(())
}

fn card(f: &mut fmt::Formatter<'_>, book: &Summary, is_favorite: bool) -> fmt::Result {
    let badge = if book.is_recommended { " [מומלץ]" } else { "" };
    let cover = if book.cover_image.is_some() {
        "🖼".to_owned()
    } else {
        book.initial().to_string()
    };
    writeln!(
        f,
        "- {cover}  {title} / {author}{badge} {star}",
        title = book.title,
        author = book.author,
        star = star(is_favorite),
    )?;
    writeln!(
        f,
        "    {} · {} דקות קריאה · {}",
        book.genre,
        book.reading_time,
        Route::Book {
            id: book.id.clone()
        }
    )
}

fn star(is_favorite: bool) -> &'static str {
    if is_favorite { "★" } else { "☆" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::MemoryStore;
    use crate::router::{MemoryHistory, Router};

    fn app_at(fragment: &str) -> App {
        App::new(
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
            Router::new(Box::new(MemoryHistory::new(fragment))),
        )
    }

    fn screen(app: &mut App) -> String {
        let route = app.route().clone();
        let state = PageState::mount(app, &route);
        render(app, &state)
    }

    #[test]
    fn missing_book_renders_not_found() {
        let mut app = app_at("#/book/9");
        assert!(screen(&mut app).contains(NOT_FOUND));
    }

    #[test]
    fn home_shows_three_recommended_and_stats() {
        let mut app = app_at("");
        let out = screen(&mut app);
        assert!(out.contains("[דף הבית]"));
        assert!(out.contains("12 דקות קריאה ממוצע"));
        assert!(out.contains("+5 סיכומי ספרים זמינים"));
        assert!(out.contains("#book/1"));
        assert!(out.contains("#book/3"));
        assert!(!out.contains("#book/4"));
    }

    #[test]
    fn admin_pages_require_session() {
        for fragment in ["#/dashboard", "#/new", "#/edit/1"] {
            let mut app = app_at(fragment);
            assert!(screen(&mut app).contains(NO_PERMISSION), "{fragment}");
        }
    }

    #[test]
    fn edit_form_is_prefilled_from_record() {
        let mut app = app_at("#/edit/2");
        assert!(app.login("admin123"));
        app.navigate(&Route::Form {
            id: Some("2".to_owned()),
        });
        let out = screen(&mut app);
        assert!(out.contains("עריכת סיכום"));
        assert!(out.contains("[time]: 15"));
        assert!(out.contains("דניאל כהנמן"));
    }

    #[test]
    fn browse_applies_filters_from_page_state() {
        let app = app_at("#/browse");
        let state = PageState::Browse {
            query: String::new(),
            genre: "פסיכולוגיה".to_owned(),
        };
        let out = render(&app, &state);
        assert!(out.contains("#book/2"));
        assert!(out.contains("#book/4"));
        assert!(!out.contains("#book/1"));

        let state = PageState::Browse {
            query: "zzz".to_owned(),
            genre: String::new(),
        };
        assert!(render(&app, &state).contains("לא נמצאו סיכומים."));
    }

    #[test]
    fn favorite_star_reflects_state() {
        let mut app = app_at("#/favorites");
        assert!(screen(&mut app).contains("עדיין לא הוספת"));
        app.toggle_favorite("5");
        let out = screen(&mut app);
        assert!(out.contains("האלכימאי"));
        assert!(out.contains("★"));
    }
}
