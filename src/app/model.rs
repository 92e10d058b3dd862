use serde::{Deserialize, Serialize};

/// One catalog entry. Field names on disk follow the `sikum-books-v3` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub summary: String,
    pub reading_time: u32,
    pub is_recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl Summary {
    /// First character of the title, used by cards without a cover image.
    pub fn initial(&self) -> char {
        self.title.trim().chars().next().unwrap_or('?')
    }
}

/// Favorite summary ids. Persisted as a plain JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<String>);

impl Favorites {
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|fav| fav == id)
    }

    /// Adds `id` when absent, removes it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.0.retain(|fav| fav != id);
            false
        } else {
            self.0.push(id.to_owned());
            true
        }
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|fav| fav != id);
        self.0.len() != before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for Favorites {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut favorites = Self::default();
        for id in iter {
            if !favorites.contains(&id) {
                favorites.0.push(id);
            }
        }
        favorites
    }
}

/// Catalog used when nothing has been persisted yet.
pub fn seed_catalog() -> Vec<Summary> {
    #[allow(clippy::too_many_arguments)]
    fn entry(
        id: &str,
        title: &str,
        author: &str,
        genre: &str,
        summary: &str,
        reading_time: u32,
        is_recommended: bool,
        cover_image: Option<&str>,
    ) -> Summary {
        Summary {
            id: id.to_owned(),
            title: title.to_owned(),
            author: author.to_owned(),
            genre: genre.to_owned(),
            summary: summary.to_owned(),
            reading_time,
            is_recommended,
            cover_image: cover_image.map(str::to_owned),
        }
    }

    vec![
        entry(
            "1",
            "הנביא",
            "ג׳ובראן חליל ג׳ובראן",
            "פילוסופיה",
            "ספר שירה ונבואה המדבר על אהבה, עבודה, שמחה וצער.",
            8,
            true,
            Some("https://placehold.co/100x100/2b3a67/ffffff?text=הנביא"),
        ),
        entry(
            "2",
            "חשיבה מהירה ואיטית",
            "דניאל כהנמן",
            "פסיכולוגיה",
            "בוחן את שתי מערכות החשיבה המניעות את האופן בו אנו חושבים.",
            15,
            true,
            None,
        ),
        entry(
            "3",
            "קיצור תולדות האנושות",
            "יובל נח הררי",
            "היסטוריה",
            "סקירה רחבה של ההיסטוריה האנושית מהאדם הקדמון ועד ימינו.",
            18,
            true,
            Some("https://placehold.co/100x100/2b3a67/ffffff?text=קיצור"),
        ),
        entry(
            "4",
            "האומץ להיות לא אהוד",
            "איצ׳ירו קישימי",
            "פסיכולוגיה",
            "דיאלוג בין פילוסוף לצעיר הבוחן את תורתו של אלפרד אדלר.",
            10,
            false,
            None,
        ),
        entry(
            "5",
            "האלכימאי",
            "פאולו קואלו",
            "ספרות",
            "רועה צאן במסע לגילוי אוצר, שמתגלה כמסע לגילוי עצמי.",
            7,
            false,
            None,
        ),
    ]
}
