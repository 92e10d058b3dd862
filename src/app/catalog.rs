use crate::app::model::{Favorites, Summary};

/// Genre facet that disables genre filtering.
pub const ALL_GENRES: &str = "הכל";

/// How many recommended summaries the landing page shows.
pub const HOME_RECOMMENDED_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub average_reading_time: u32,
    pub recommended: usize,
    /// Descending by count; equal counts keep first-appearance order.
    pub per_genre: Vec<(String, usize)>,
}

pub fn recommended(books: &[Summary], limit: usize) -> Vec<&Summary> {
    books
        .iter()
        .filter(|book| book.is_recommended)
        .take(limit)
        .collect()
}

/// [`ALL_GENRES`] followed by each distinct genre in catalog order.
pub fn genres(books: &[Summary]) -> Vec<String> {
    let mut out = vec![ALL_GENRES.to_owned()];
    for book in books {
        if !out.iter().any(|genre| genre == &book.genre) {
            out.push(book.genre.clone());
        }
    }
    out
}

/// Case-insensitive substring search over title and author, optionally narrowed to a genre.
pub fn filter<'a>(books: &'a [Summary], query: &str, genre: Option<&str>) -> Vec<&'a Summary> {
    let query = query.to_lowercase();
    let genre = genre.filter(|genre| !genre.is_empty() && *genre != ALL_GENRES);
    books
        .iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&query) || book.author.to_lowercase().contains(&query)
        })
        .filter(|book| genre.is_none_or(|genre| book.genre == genre))
        .collect()
}

pub fn favorite_summaries<'a>(books: &'a [Summary], favorites: &Favorites) -> Vec<&'a Summary> {
    books
        .iter()
        .filter(|book| favorites.contains(&book.id))
        .collect()
}

/// Mean of `reading_time`, rounded half up. Zero for an empty catalog.
pub fn average_reading_time(books: &[Summary]) -> u32 {
    if books.is_empty() {
        return 0;
    }
    let total: u64 = books.iter().map(|book| u64::from(book.reading_time)).sum();
    let count = books.len() as u64;
    u32::try_from((2 * total + count) / (2 * count)).unwrap_or(u32::MAX)
}

pub fn stats(books: &[Summary]) -> CatalogStats {
    let mut per_genre: Vec<(String, usize)> = Vec::new();
    for book in books {
        match per_genre.iter_mut().find(|(genre, _)| genre == &book.genre) {
            Some((_, count)) => *count += 1,
            None => per_genre.push((book.genre.clone(), 1)),
        }
    }
    per_genre.sort_by(|(_, a), (_, b)| b.cmp(a));

    CatalogStats {
        total: books.len(),
        average_reading_time: average_reading_time(books),
        recommended: books.iter().filter(|book| book.is_recommended).count(),
        per_genre,
    }
}
