use {
    crate::error::CatalogError,
    serde::Deserialize,
    serde_json::{Map, Value},
    std::{
        str::FromStr,
        sync::{Mutex, PoisonError},
    },
};

pub const SEED: [&str; 5] = [
    "The Hobbit",
    "1984",
    "To Kill a Mockingbird",
    "Moby Dick",
    "Pride and Prejudice",
];

/// Position of a book in the catalog.
///
/// Positions are the only identity a book has, removing a book shifts every
/// book after it down by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookIndex(usize);

impl BookIndex {
    pub fn new(index: usize) -> Self {
        BookIndex(index)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl FromStr for BookIndex {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<usize>()
            .map(BookIndex)
            .map_err(CatalogError::InvalidIndex)
    }
}

impl std::fmt::Display for BookIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of the create and update requests.
#[derive(Debug, Default, Deserialize)]
pub struct TitlePayload {
    pub title: Option<String>,
}

impl TitlePayload {
    /// Parses a raw request body, an empty body counts as `{}`.
    ///
    /// Only a JSON object is accepted, serde would otherwise read `["Dune"]`
    /// as a struct given in sequence form.
    pub fn from_slice(body: &[u8]) -> Result<Self, CatalogError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(TitlePayload::default());
        }

        let object = serde_json::from_slice::<Map<String, Value>>(body)
            .map_err(CatalogError::MalformedBody)?;

        serde_json::from_value(Value::Object(object)).map_err(CatalogError::MalformedBody)
    }
}

/// A title that passed validation.
///
/// The stored value is the title as sent, only the check ignores surrounding
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn new(raw: Option<String>) -> Result<Self, CatalogError> {
        match raw {
            Some(title) if !is_blank(&title) => Ok(Title(title)),
            _ => Err(CatalogError::BlankTitle),
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// `char::is_whitespace` leaves U+FEFF alone, a lone byte order mark is still blank.
fn is_blank(title: &str) -> bool {
    title
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}

impl std::convert::TryFrom<TitlePayload> for Title {
    type Error = CatalogError;

    fn try_from(payload: TitlePayload) -> Result<Self, Self::Error> {
        Title::new(payload.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    books: Vec<String>,
}

impl Catalog {
    pub fn new(books: Vec<String>) -> Self {
        Catalog { books }
    }

    pub fn seeded() -> Self {
        Catalog::new(SEED.iter().map(|title| title.to_string()).collect())
    }

    pub fn books(&self) -> &[String] {
        &self.books
    }

    /// Every title containing `query`, ignoring case, in catalog order.
    pub fn search(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();

        self.books
            .iter()
            .filter(|title| title.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    fn check(&self, index: BookIndex) -> Result<usize, CatalogError> {
        let len = self.books.len();

        if index.get() < len {
            Ok(index.get())
        } else {
            Err(CatalogError::NotFound {
                index: index.get(),
                len,
            })
        }
    }

    pub fn get(&self, index: BookIndex) -> Result<&str, CatalogError> {
        let index = self.check(index)?;

        Ok(&self.books[index])
    }

    /// Appends a title and returns its index.
    pub fn add(&mut self, title: Title) -> BookIndex {
        self.books.push(title.into_inner());

        BookIndex::new(self.books.len() - 1)
    }

    /// Replaces the title at `index`.
    ///
    /// The index is checked before the payload, so an out of range index wins
    /// over a missing or malformed title.
    pub fn update(
        &mut self,
        index: BookIndex,
        payload: Result<TitlePayload, CatalogError>,
    ) -> Result<(), CatalogError> {
        let index = self.check(index)?;
        let title = Title::new(payload?.title)?;

        self.books[index] = title.into_inner();

        Ok(())
    }

    pub fn remove(&mut self, index: BookIndex) -> Result<String, CatalogError> {
        let index = self.check(index)?;

        Ok(self.books.remove(index))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::seeded()
    }
}

/// The catalog as shared between the server's workers.
///
/// Each request runs its whole read, validate and mutate sequence inside one
/// call to [`SharedCatalog::with`], so requests never interleave.
#[derive(Debug, Default)]
pub struct SharedCatalog(Mutex<Catalog>);

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        SharedCatalog(Mutex::new(catalog))
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        // No operation can leave the catalog half-mutated, so a poisoned lock is
        // still consistent.
        let mut catalog = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        f(&mut *catalog)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::convert::TryFrom};

    fn title(raw: &str) -> Title {
        Title::new(Some(raw.to_string())).unwrap()
    }

    #[test]
    fn seeded_catalog_keeps_order() {
        let catalog = Catalog::seeded();

        assert_eq!(catalog.books(), &SEED[..]);
    }

    #[test]
    fn search_ignores_case_and_keeps_order() {
        let catalog = Catalog::seeded();

        assert_eq!(catalog.search("moby"), vec!["Moby Dick"]);
        assert_eq!(
            catalog.search("O"),
            vec![
                "The Hobbit",
                "To Kill a Mockingbird",
                "Moby Dick",
                "Pride and Prejudice"
            ]
        );
        assert!(catalog.search("dune").is_empty());
    }

    #[test]
    fn search_does_not_trim_the_query() {
        let catalog = Catalog::seeded();

        assert_eq!(catalog.search(" dick"), vec!["Moby Dick"]);
        assert!(catalog.search("dick ").is_empty());
        assert_eq!(catalog.search(""), catalog.books());
    }

    #[test]
    fn index_parsing_is_strict() {
        assert_eq!("3".parse::<BookIndex>().unwrap(), BookIndex::new(3));
        assert!(matches!(
            "abc".parse::<BookIndex>(),
            Err(CatalogError::InvalidIndex(_))
        ));
        assert!(matches!(
            "-1".parse::<BookIndex>(),
            Err(CatalogError::InvalidIndex(_))
        ));
        assert!(matches!(
            "1.5".parse::<BookIndex>(),
            Err(CatalogError::InvalidIndex(_))
        ));
    }

    #[test]
    fn get_checks_bounds() {
        let catalog = Catalog::seeded();

        assert_eq!(catalog.get(BookIndex::new(4)).unwrap(), "Pride and Prejudice");
        assert!(matches!(
            catalog.get(BookIndex::new(5)),
            Err(CatalogError::NotFound { index: 5, len: 5 })
        ));
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert!(matches!(Title::new(None), Err(CatalogError::BlankTitle)));
        assert!(matches!(
            Title::new(Some(String::new())),
            Err(CatalogError::BlankTitle)
        ));
        assert!(matches!(
            Title::new(Some(" \t\n ".to_string())),
            Err(CatalogError::BlankTitle)
        ));
        assert!(matches!(
            Title::new(Some("\u{feff} \u{a0}".to_string())),
            Err(CatalogError::BlankTitle)
        ));
    }

    #[test]
    fn accepted_titles_are_stored_untrimmed() {
        let mut catalog = Catalog::seeded();

        let index = catalog.add(title("  Dune  "));

        assert_eq!(index, BookIndex::new(5));
        assert_eq!(catalog.get(index).unwrap(), "  Dune  ");
    }

    #[test]
    fn update_checks_bounds_before_the_title() {
        let mut catalog = Catalog::seeded();

        let outcome = catalog.update(
            BookIndex::new(7),
            Ok(TitlePayload {
                title: Some("  ".to_string()),
            }),
        );
        assert!(matches!(outcome, Err(CatalogError::NotFound { .. })));

        let outcome = catalog.update(BookIndex::new(0), Ok(TitlePayload::default()));
        assert!(matches!(outcome, Err(CatalogError::BlankTitle)));
        assert_eq!(catalog, Catalog::seeded());
    }

    #[test]
    fn update_replaces_in_place() {
        let mut catalog = Catalog::seeded();

        catalog
            .update(
                BookIndex::new(2),
                Ok(TitlePayload {
                    title: Some("Dune".to_string()),
                }),
            )
            .unwrap();

        assert_eq!(catalog.books().len(), 5);
        assert_eq!(catalog.get(BookIndex::new(2)).unwrap(), "Dune");
        assert_eq!(catalog.get(BookIndex::new(1)).unwrap(), "1984");
    }

    #[test]
    fn remove_shifts_later_books_down() {
        let mut catalog = Catalog::seeded();

        assert_eq!(catalog.remove(BookIndex::new(1)).unwrap(), "1984");
        assert_eq!(
            catalog.books(),
            &["The Hobbit", "To Kill a Mockingbird", "Moby Dick", "Pride and Prejudice"]
        );
        assert!(matches!(
            catalog.remove(BookIndex::new(4)),
            Err(CatalogError::NotFound { index: 4, len: 4 })
        ));
    }

    #[test]
    fn payload_parsing() {
        assert!(TitlePayload::from_slice(b"").unwrap().title.is_none());
        assert!(TitlePayload::from_slice(b"{}").unwrap().title.is_none());
        assert_eq!(
            TitlePayload::from_slice(br#"{"title":"Dune","author":"Herbert"}"#)
                .unwrap()
                .title
                .as_deref(),
            Some("Dune")
        );
        assert!(matches!(
            TitlePayload::from_slice(b"{\"title\":"),
            Err(CatalogError::MalformedBody(_))
        ));
        assert!(matches!(
            TitlePayload::from_slice(br#"{"title":42}"#),
            Err(CatalogError::MalformedBody(_))
        ));

        assert!(matches!(
            TitlePayload::from_slice(br#"["Dune"]"#),
            Err(CatalogError::MalformedBody(_))
        ));
        assert!(matches!(
            TitlePayload::from_slice(br#""Dune""#),
            Err(CatalogError::MalformedBody(_))
        ));

        let payload = TitlePayload::from_slice(br#"{"title":null}"#).unwrap();
        assert!(matches!(Title::try_from(payload), Err(CatalogError::BlankTitle)));
    }

    #[test]
    fn shared_catalog_runs_closures_under_the_lock() {
        let shared = SharedCatalog::default();

        let index = shared.with(|catalog| catalog.add(title("Dune")));
        let len = shared.with(|catalog| catalog.books().len());

        assert_eq!(index.get(), 5);
        assert_eq!(len, 6);
    }
}
