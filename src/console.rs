use std::io::{BufRead, Write};
use std::sync::mpsc;

use anyhow::Context as _;

use crate::app::App;
use crate::app::form::{Field, FormError, SummaryDraft};
use crate::route::Route;
use crate::view::{self, NO_PERMISSION, NOT_FOUND, PageState, WRONG_PASSWORD};

pub const HELP: &str = "\
commands:
  go <fragment> | #<fragment>   open a page (home, browse, book/<id>, new, edit/<id>, admin, favorites, dashboard)
  back | forward                move through history
  search <text>                 search from the home page
  query <text> | genre <name>   filter the browse page
  fav <id>                      toggle a favorite
  login <password> | logout     admin session (login on the admin page)
  new | edit <id> | delete <id> manage summaries (admin)
  set <field> <value>           edit the form (title, author, genre, cover, time, summary)
  toggle recommended            flip the form's recommended flag
  submit | cancel               finish the form
  show | help | quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Go(String),
    Back,
    Forward,
    Search(String),
    Query(String),
    Genre(String),
    Favorite(String),
    Login(String),
    Logout,
    New,
    Edit(String),
    Delete(String),
    Set(String, String),
    ToggleRecommended,
    Submit,
    Cancel,
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Action {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Action::Empty;
        }
        if line.starts_with('#') {
            return Action::Go(line.to_owned());
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = rest.to_owned();

        match (word.to_ascii_lowercase().as_str(), rest.is_empty()) {
            ("go" | "open", false) => Action::Go(arg),
            ("back", _) => Action::Back,
            ("forward", _) => Action::Forward,
            ("search", _) => Action::Search(arg),
            ("query", _) => Action::Query(arg),
            ("genre", _) => Action::Genre(arg),
            ("fav", false) => Action::Favorite(arg),
            ("login", _) => Action::Login(arg),
            ("logout", _) => Action::Logout,
            ("new", _) => Action::New,
            ("edit", false) => Action::Edit(arg),
            ("delete", false) => Action::Delete(arg),
            ("set", false) => match rest.split_once(char::is_whitespace) {
                Some((field, value)) => Action::Set(field.to_owned(), value.trim().to_owned()),
                None => Action::Set(rest.to_owned(), String::new()),
            },
            ("toggle", _) if rest.eq_ignore_ascii_case("recommended") => {
                Action::ToggleRecommended
            }
            ("submit", _) => Action::Submit,
            ("cancel", _) => Action::Cancel,
            ("show", _) => Action::Show,
            ("help", _) => Action::Help,
            ("quit" | "exit", _) => Action::Quit,
            _ => Action::Unknown(line.to_owned()),
        }
    }
}

/// Drives an [`App`] from line-oriented input, one action at a time.
pub struct Console {
    app: App,
    routes: mpsc::Receiver<Route>,
    page: PageState,
    pending_delete: Option<String>,
    prompt: bool,
}

enum Step {
    Render,
    Say(String),
    Nothing,
    Quit,
}

impl Console {
    pub fn new(mut app: App) -> Self {
        let routes = app.router_mut().subscribe();
        let route = app.route().clone();
        let page = PageState::mount(&mut app, &route);
        Self {
            app,
            routes,
            page,
            pending_delete: None,
            prompt: false,
        }
    }

    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn screen(&self) -> String {
        view::render(&self.app, &self.page)
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> anyhow::Result<()> {
        write!(out, "{}", self.screen()).context("write screen")?;
        self.show_prompt(out)?;

        for line in input.lines() {
            let line = line.context("read input line")?;
            let quit = self.pending_delete.is_none() && Action::parse(&line) == Action::Quit;
            let text = self.handle_line(&line);
            if let Some(text) = &text {
                writeln!(out).context("write output")?;
                write!(out, "{text}").context("write output")?;
                if !text.ends_with('\n') {
                    writeln!(out).context("write output")?;
                }
            }
            if quit {
                break;
            }
            self.show_prompt(out)?;
        }
        out.flush().context("flush output")?;
        Ok(())
    }

    fn show_prompt<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        if self.prompt {
            write!(out, "> ").context("write prompt")?;
            out.flush().context("flush prompt")?;
        }
        Ok(())
    }

    /// Handles one input line and returns what should be printed, if anything.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        if let Some(id) = self.pending_delete.take() {
            return Some(self.confirm_delete(&id, line));
        }

        let action = Action::parse(line);
        tracing::debug!(?action, "console action");
        match self.apply(action) {
            Step::Render => {
                self.sync_routes();
                Some(self.screen())
            }
            Step::Say(text) => {
                self.sync_routes();
                Some(text)
            }
            Step::Nothing | Step::Quit => None,
        }
    }

    /// Remounts the page for each published route.
    fn sync_routes(&mut self) {
        while let Ok(route) = self.routes.try_recv() {
            self.page = PageState::mount(&mut self.app, &route);
        }
    }

    fn apply(&mut self, action: Action) -> Step {
        match action {
            Action::Go(fragment) => {
                self.app.router_mut().open(&fragment);
                Step::Render
            }
            Action::Back => {
                self.app.router_mut().back();
                Step::Render
            }
            Action::Forward => {
                self.app.router_mut().forward();
                Step::Render
            }
            Action::Search(query) => {
                if self.app.route() != &Route::Home {
                    return Step::Say("search is on the home page; use `query` here".to_owned());
                }
                self.app.search_from_home(&query);
                Step::Render
            }
            Action::Query(text) => match &mut self.page {
                PageState::Browse { query, .. } => {
                    *query = text;
                    Step::Render
                }
                _ => Step::Say("`query` works on the browse page".to_owned()),
            },
            Action::Genre(name) => match &mut self.page {
                PageState::Browse { genre, .. } => {
                    *genre = name;
                    Step::Render
                }
                _ => Step::Say("`genre` works on the browse page".to_owned()),
            },
            Action::Favorite(id) => {
                self.app.toggle_favorite(&id);
                Step::Render
            }
            Action::Login(password) => self.login(&password),
            Action::Logout => {
                self.app.logout();
                Step::Render
            }
            Action::New => {
                self.app.navigate(&Route::Form { id: None });
                Step::Render
            }
            Action::Edit(id) => {
                self.app.navigate(&Route::Form { id: Some(id) });
                Step::Render
            }
            Action::Delete(id) => self.request_delete(id),
            Action::Set(field, value) => self.edit_draft(|draft| {
                let field = Field::parse(&field)?;
                draft.set(field, value);
                Ok(())
            }),
            Action::ToggleRecommended => self.edit_draft(|draft| {
                draft.toggle_recommended();
                Ok(())
            }),
            Action::Submit => self.submit(),
            Action::Cancel => match self.page {
                PageState::Form { .. } => {
                    self.app.navigate(&Route::Browse);
                    Step::Render
                }
                _ => Step::Say("nothing to cancel".to_owned()),
            },
            Action::Show => Step::Render,
            Action::Help => Step::Say(HELP.to_owned()),
            Action::Quit => Step::Quit,
            Action::Empty => Step::Nothing,
            Action::Unknown(line) => Step::Say(format!("unknown command: {line} (try `help`)")),
        }
    }

    fn login(&mut self, password: &str) -> Step {
        let PageState::Admin { error } = &mut self.page else {
            return Step::Say(format!("open {} to log in", Route::Admin));
        };
        if self.app.login(password) {
            return Step::Render;
        }
        *error = Some(WRONG_PASSWORD.to_owned());
        Step::Render
    }

    fn request_delete(&mut self, id: String) -> Step {
        if !self.app.is_admin() {
            return Step::Say(NO_PERMISSION.to_owned());
        }
        let Some(summary) = self.app.summary(&id) else {
            return Step::Say(NOT_FOUND.to_owned());
        };
        let question = format!(
            "האם אתה בטוח שברצונך למחוק את \"{}\"? (y/N)",
            summary.title
        );
        self.pending_delete = Some(id);
        Step::Say(question)
    }

    fn confirm_delete(&mut self, id: &str, answer: &str) -> String {
        let answer = answer.trim().to_lowercase();
        if !matches!(answer.as_str(), "y" | "yes" | "כן") {
            return "deletion cancelled".to_owned();
        }
        self.app.delete_summary(id);
        self.sync_routes();
        self.screen()
    }

    fn edit_draft(
        &mut self,
        edit: impl FnOnce(&mut SummaryDraft) -> Result<(), FormError>,
    ) -> Step {
        if !self.app.is_admin() {
            return Step::Say(NO_PERMISSION.to_owned());
        }
        let PageState::Form { draft, error, .. } = &mut self.page else {
            return Step::Say("open the form first (`new` or `edit <id>`)".to_owned());
        };
        if let Err(err) = edit(draft) {
            return Step::Say(err.to_string());
        }
        *error = None;
        Step::Render
    }

    fn submit(&mut self) -> Step {
        if !self.app.is_admin() {
            return Step::Say(NO_PERMISSION.to_owned());
        }
        let PageState::Form {
            editing,
            draft,
            error,
        } = &mut self.page
        else {
            return Step::Say("nothing to submit".to_owned());
        };

        let id = editing.clone().unwrap_or_else(|| self.app.next_id());
        match draft.submit(id) {
            Ok(summary) => self.app.save_summary(summary),
            Err(err) => *error = Some(err.to_string()),
        }
        Step::Render
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_navigation_actions() {
        assert_eq!(Action::parse("#/book/3"), Action::Go("#/book/3".to_owned()));
        assert_eq!(Action::parse("go browse"), Action::Go("browse".to_owned()));
        assert_eq!(Action::parse("  BACK "), Action::Back);
        assert_eq!(Action::parse(""), Action::Empty);
    }

    #[test]
    fn parse_arguments_keep_inner_spaces() {
        assert_eq!(
            Action::parse("set title  Thinking, Fast and Slow"),
            Action::Set("title".to_owned(), "Thinking, Fast and Slow".to_owned())
        );
        assert_eq!(
            Action::parse("search קיצור תולדות"),
            Action::Search("קיצור תולדות".to_owned())
        );
        assert_eq!(Action::parse("query"), Action::Query(String::new()));
        assert_eq!(Action::parse("toggle recommended"), Action::ToggleRecommended);
    }

    #[test]
    fn parse_rejects_missing_ids() {
        assert_eq!(Action::parse("fav"), Action::Unknown("fav".to_owned()));
        assert_eq!(Action::parse("delete"), Action::Unknown("delete".to_owned()));
        assert_eq!(
            Action::parse("frobnicate 1"),
            Action::Unknown("frobnicate 1".to_owned())
        );
    }
}
