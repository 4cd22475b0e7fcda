use serde::{Deserialize, Serialize};

/// One verse as returned to the browser, tagged with the reference it was fetched under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibleVerse {
    pub book_id: String,
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationSlide {
    pub reference: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub title: String,
    pub slides: Vec<PresentationSlide>,
}

impl Presentation {
    /// One slide per verse. The title is the reference of the first verse's envelope.
    pub fn from_verses(verses: &[BibleVerse]) -> Self {
        let title = verses
            .first()
            .map(|v| v.reference.clone())
            .unwrap_or_default();
        let slides = verses
            .iter()
            .map(|v| PresentationSlide {
                reference: format!("{} {}:{}", v.book_name, v.chapter, v.verse),
                text: v.text.trim().to_string(),
            })
            .collect();
        Self { title, slides }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_has_a_slide_per_verse() {
        let verses = vec![
            BibleVerse {
                book_id: "JHN".into(),
                book_name: "John".into(),
                chapter: 3,
                verse: 16,
                text: "For God so loved the world,\n".into(),
                reference: "John 3:16-17".into(),
            },
            BibleVerse {
                book_id: "JHN".into(),
                book_name: "John".into(),
                chapter: 3,
                verse: 17,
                text: "For God sent not his Son...".into(),
                reference: "John 3:16-17".into(),
            },
        ];

        let presentation = Presentation::from_verses(&verses);
        assert_eq!(presentation.title, "John 3:16-17");
        assert_eq!(presentation.slides.len(), 2);
        assert_eq!(presentation.slides[0].reference, "John 3:16");
        assert_eq!(presentation.slides[0].text, "For God so loved the world,");
    }
}
