use scraper::{ElementRef, Html, Selector};

/// Result of extracting one HTML document
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The page title (from the <title> tag), if present and non-empty
    pub title: Option<String>,

    /// Plain text content with whitespace runs collapsed to single spaces
    pub text: String,

    /// True when the parser had to recover from malformed markup; the
    /// title/text are still usable, just best-effort
    pub lossy: bool,
}

/// Extracts the title and normalized text content from an HTML document.
///
/// Script and style subtrees are excluded from text collection, then all
/// remaining text nodes are concatenated and whitespace-collapsed.
///
/// # Example
///
/// ```
/// use docdex::extract::extract;
///
/// let html = "<html><head><title>SPK Required Reading</title></head>\
///             <body><p>Ephemeris  data</p></body></html>";
/// let extraction = extract(html);
/// assert_eq!(extraction.title.as_deref(), Some("SPK Required Reading"));
/// assert_eq!(extraction.text, "SPK Required Reading Ephemeris data");
/// ```
pub fn extract(html: &str) -> Extraction {
    let document = Html::parse_document(html);
    let lossy = !document.errors.is_empty();

    let title = extract_title(&document);

    let mut raw_text = String::new();
    collect_text(document.root_element(), &mut raw_text);
    let text = collapse_whitespace(&raw_text);

    Extraction { title, text, lossy }
}

/// Extracts the raw `href` attribute values of all anchor elements, in
/// document order. Duplicates are preserved; no resolution or filtering
/// happens here.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Walks the element tree collecting text nodes, skipping non-content
/// subtrees entirely.
fn collect_text(element: ElementRef, out: &mut String) {
    if matches!(element.value().name(), "script" | "style") {
        return;
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, out);
        }
    }
}

/// Collapses all whitespace runs (including newlines) to single spaces
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
