use crate::app::model::Summary;

pub const DEFAULT_READING_TIME: &str = "10";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("missing required field: {0}")]
    MissingField(Field),

    #[error("reading time must be a positive whole number of minutes, got {0:?}")]
    InvalidReadingTime(String),

    #[error("cover image must be an absolute URL: {0}")]
    InvalidCoverImage(String),

    #[error("unknown form field: {0:?}")]
    UnknownField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Genre,
    CoverImage,
    ReadingTime,
    Summary,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Author,
        Field::Genre,
        Field::CoverImage,
        Field::ReadingTime,
        Field::Summary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Genre => "genre",
            Field::CoverImage => "cover",
            Field::ReadingTime => "time",
            Field::Summary => "summary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "כותרת",
            Field::Author => "מחבר",
            Field::Genre => "ז'אנר",
            Field::CoverImage => "קישור לתמונת כריכה (URL)",
            Field::ReadingTime => "זמן קריאה (דקות)",
            Field::Summary => "סיכום",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, FormError> {
        let raw = raw.trim().to_ascii_lowercase();
        Field::ALL
            .into_iter()
            .find(|field| field.name() == raw)
            .ok_or(FormError::UnknownField(raw))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Editable copy of a summary's fields. Nothing is committed until [`SummaryDraft::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub summary: String,
    pub reading_time: String,
    pub is_recommended: bool,
    pub cover_image: String,
}

impl Default for SummaryDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            genre: String::new(),
            summary: String::new(),
            reading_time: DEFAULT_READING_TIME.to_owned(),
            is_recommended: false,
            cover_image: String::new(),
        }
    }
}

impl From<&Summary> for SummaryDraft {
    fn from(summary: &Summary) -> Self {
        Self {
            title: summary.title.clone(),
            author: summary.author.clone(),
            genre: summary.genre.clone(),
            summary: summary.summary.clone(),
            reading_time: summary.reading_time.to_string(),
            is_recommended: summary.is_recommended,
            cover_image: summary.cover_image.clone().unwrap_or_default(),
        }
    }
}

impl SummaryDraft {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Genre => &self.genre,
            Field::CoverImage => &self.cover_image,
            Field::ReadingTime => &self.reading_time,
            Field::Summary => &self.summary,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Author => self.author = value,
            Field::Genre => self.genre = value,
            Field::CoverImage => self.cover_image = value,
            Field::ReadingTime => self.reading_time = value,
            Field::Summary => self.summary = value,
        }
    }

    pub fn toggle_recommended(&mut self) {
        self.is_recommended = !self.is_recommended;
    }

    /// Validates the draft and builds the record to store under `id`.
    pub fn submit(&self, id: String) -> Result<Summary, FormError> {
        for field in Field::ALL {
            if field != Field::CoverImage && self.value(field).trim().is_empty() {
                return Err(FormError::MissingField(field));
            }
        }

        let reading_time = self
            .reading_time
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| FormError::InvalidReadingTime(self.reading_time.clone()))?;

        let cover_image = match self.cover_image.trim() {
            "" => None,
            raw => {
                url::Url::parse(raw).map_err(|_| FormError::InvalidCoverImage(raw.to_owned()))?;
                Some(raw.to_owned())
            }
        };

        Ok(Summary {
            id,
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            summary: self.summary.clone(),
            reading_time,
            is_recommended: self.is_recommended,
            cover_image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SummaryDraft {
        let mut draft = SummaryDraft::default();
        draft.set(Field::Title, "Dune");
        draft.set(Field::Author, "Frank Herbert");
        draft.set(Field::Genre, "Sci-fi");
        draft.set(Field::Summary, "Spice.");
        draft
    }

    #[test]
    fn defaults_use_ten_minutes_and_not_recommended() {
        let draft = SummaryDraft::default();
        assert_eq!(draft.reading_time, "10");
        assert!(!draft.is_recommended);
    }

    #[test]
    fn submit_builds_record_without_cover() {
        let summary = filled().submit("abc".to_owned()).unwrap();
        assert_eq!(summary.id, "abc");
        assert_eq!(summary.reading_time, 10);
        assert_eq!(summary.cover_image, None);
    }

    #[test]
    fn submit_requires_fields() {
        let mut draft = filled();
        draft.set(Field::Genre, "   ");
        assert_eq!(
            draft.submit("x".to_owned()),
            Err(FormError::MissingField(Field::Genre))
        );
    }

    #[test]
    fn submit_rejects_non_positive_reading_time() {
        for raw in ["0", "-3", "ten", "2.5"] {
            let mut draft = filled();
            draft.set(Field::ReadingTime, raw);
            assert_eq!(
                draft.submit("x".to_owned()),
                Err(FormError::InvalidReadingTime(raw.to_owned()))
            );
        }
    }

    #[test]
    fn submit_validates_cover_url() {
        let mut draft = filled();
        draft.set(Field::CoverImage, "not a url");
        assert!(matches!(
            draft.submit("x".to_owned()),
            Err(FormError::InvalidCoverImage(_))
        ));

        draft.set(Field::CoverImage, "https://example.com/dune.jpg");
        let summary = draft.submit("x".to_owned()).unwrap();
        assert_eq!(
            summary.cover_image.as_deref(),
            Some("https://example.com/dune.jpg")
        );
    }

    #[test]
    fn draft_from_summary_round_trips_through_submit() {
        let before = filled().submit("id-1".to_owned()).unwrap();
        let mut draft = SummaryDraft::from(&before);
        draft.toggle_recommended();
        let edited = draft.submit(before.id.clone()).unwrap();
        assert!(edited.is_recommended);
        assert_eq!(edited.title, before.title);
    }

    #[test]
    fn field_names_parse() {
        assert_eq!(Field::parse(" Time ").unwrap(), Field::ReadingTime);
        assert_eq!(
            Field::parse("isbn"),
            Err(FormError::UnknownField("isbn".to_owned()))
        );
    }
}
