//! HTML page rendering
//!
//! Templates are embedded at compile time and filled by a single-pass
//! `{{KEY}}` substitution, so inserted values are never re-expanded.
//! Every value that comes from users goes through `html_escape` first.

use axum::response::Html;
use html_escape::{encode_double_quoted_attribute, encode_text};
use quotes_common::stats::Dashboard;
use quotes_common::{QuoteWithSource, Source, SourceType, ValidationError};

use crate::api::admin::{AddQuoteForm, AddSourceForm};

const LAYOUT_HTML: &str = include_str!("../ui/layout.html");
const RANDOM_QUOTE_HTML: &str = include_str!("../ui/random_quote.html");
const ADD_QUOTE_HTML: &str = include_str!("../ui/add_quote.html");
const ADD_SOURCE_HTML: &str = include_str!("../ui/add_source.html");
const POPULAR_HTML: &str = include_str!("../ui/popular.html");
const DASHBOARD_HTML: &str = include_str!("../ui/dashboard.html");

const NO_QUOTES_HTML: &str =
    r#"<p class="empty">No quotes yet. <a href="/add/">Add the first one</a>.</p>"#;

/// Replace `{{KEY}}` placeholders in one pass. Unknown keys are left as-is.
pub fn render(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Confirmation shown on the page a successful form post redirects to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    QuoteAdded,
    SourceAdded,
}

impl Notice {
    /// Value of the `added` query parameter carrying this notice
    pub fn query_value(self) -> &'static str {
        match self {
            Notice::QuoteAdded => "quote",
            Notice::SourceAdded => "source",
        }
    }

    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "quote" => Some(Notice::QuoteAdded),
            "source" => Some(Notice::SourceAdded),
            _ => None,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Notice::QuoteAdded => "Quote added successfully!",
            Notice::SourceAdded => "Source added successfully!",
        }
    }
}

fn page(title: &str, content: &str) -> Html<String> {
    page_with_notice(title, None, content)
}

fn page_with_notice(title: &str, notice: Option<Notice>, content: &str) -> Html<String> {
    let notice = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, n.message()))
        .unwrap_or_default();

    Html(render(
        LAYOUT_HTML,
        &[
            ("TITLE", title.to_string()),
            ("NOTICE", notice),
            ("CONTENT", content.to_string()),
        ],
    ))
}

fn field_error(error: Option<&ValidationError>, field: &str) -> String {
    match error {
        Some(err) if err.field() == field => {
            format!(r#"<p class="field-error">{}</p>"#, encode_text(&err.to_string()))
        }
        _ => String::new(),
    }
}

fn format_weight(weight: f64) -> String {
    format!("{:.1}", weight)
}

/// Short card used by the popular and dashboard pages
fn quote_card(quote: &QuoteWithSource) -> String {
    format!(
        r#"<blockquote>{}</blockquote>
<p class="attribution">{}</p>
<p class="meta">Rating: {} | Likes: {} | Dislikes: {} | Views: {}</p>"#,
        encode_text(&quote.quote.text),
        encode_text(&quote.attribution()),
        quote.quote.rating(),
        quote.quote.likes,
        quote.quote.dislikes,
        quote.quote.views,
    )
}

pub fn random_quote(
    quote: Option<&QuoteWithSource>,
    total_quotes: i64,
    notice: Option<Notice>,
) -> Html<String> {
    let Some(quote) = quote else {
        return page_with_notice("Random quote", notice, NO_QUOTES_HTML);
    };

    let content = render(
        RANDOM_QUOTE_HTML,
        &[
            ("QUOTE_ID", quote.quote.id.to_string()),
            ("TEXT", encode_text(&quote.quote.text).into_owned()),
            ("ATTRIBUTION", encode_text(&quote.attribution()).into_owned()),
            ("LIKES", quote.quote.likes.to_string()),
            ("DISLIKES", quote.quote.dislikes.to_string()),
            ("VIEWS", quote.quote.views.to_string()),
            ("WEIGHT", format_weight(quote.quote.weight)),
            ("TOTAL_QUOTES", total_quotes.to_string()),
        ],
    );

    page_with_notice("Random quote", notice, &content)
}

pub fn add_quote(
    sources: &[Source],
    form: &AddQuoteForm,
    error: Option<&ValidationError>,
    notice: Option<Notice>,
) -> Html<String> {
    let options: String = sources
        .iter()
        .map(|source| {
            let value = source.id.to_string();
            let selected = if form.source == value { " selected" } else { "" };
            format!(
                "        <option value=\"{}\"{}>{}</option>\n",
                value,
                selected,
                encode_text(&source.to_string())
            )
        })
        .collect();

    let content = render(
        ADD_QUOTE_HTML,
        &[
            ("TEXT", encode_text(&form.text).into_owned()),
            ("TEXT_ERROR", field_error(error, "text")),
            ("SOURCE_OPTIONS", options),
            ("SOURCE_ERROR", field_error(error, "source")),
            ("WEIGHT", encode_double_quoted_attribute(&form.weight).into_owned()),
            ("WEIGHT_ERROR", field_error(error, "weight")),
        ],
    );

    page_with_notice("Add quote", notice, &content)
}

pub fn add_source(
    sources: &[Source],
    form: &AddSourceForm,
    error: Option<&ValidationError>,
) -> Html<String> {
    let type_options: String = SourceType::ALL
        .iter()
        .map(|t| {
            let selected = if form.source_type == t.as_str() { " selected" } else { "" };
            format!(
                "        <option value=\"{}\"{}>{}</option>\n",
                t.as_str(),
                selected,
                t.label()
            )
        })
        .collect();

    let source_list = if sources.is_empty() {
        r#"<p class="empty">No sources yet.</p>"#.to_string()
    } else {
        let items: String = sources
            .iter()
            .map(|s| format!("    <li>{}</li>\n", encode_text(&s.to_string())))
            .collect();
        format!("<ul>\n{}</ul>", items)
    };

    let content = render(
        ADD_SOURCE_HTML,
        &[
            ("NAME", encode_double_quoted_attribute(&form.name).into_owned()),
            ("NAME_ERROR", field_error(error, "name")),
            ("TYPE_OPTIONS", type_options),
            ("TYPE_ERROR", field_error(error, "type")),
            ("SOURCES", source_list),
        ],
    );

    page("Add source", &content)
}

pub fn popular(quotes: &[QuoteWithSource], limit: i64) -> Html<String> {
    let rows = if quotes.is_empty() {
        NO_QUOTES_HTML.to_string()
    } else {
        let items: String = quotes
            .iter()
            .map(|q| format!("<li>\n{}\n</li>\n", quote_card(q)))
            .collect();
        format!("<ol class=\"popular\">\n{}</ol>", items)
    };

    let content = render(POPULAR_HTML, &[("LIMIT", limit.to_string()), ("ROWS", rows)]);
    page("Popular quotes", &content)
}

pub fn dashboard(stats: &Dashboard) -> Html<String> {
    let card_or_empty = |quote: Option<&QuoteWithSource>| match quote {
        Some(q) => quote_card(q),
        None => NO_QUOTES_HTML.to_string(),
    };

    let content = render(
        DASHBOARD_HTML,
        &[
            ("TOTAL_QUOTES", stats.total_quotes.to_string()),
            ("TOTAL_SOURCES", stats.total_sources.to_string()),
            ("TOTAL_VIEWS", stats.total_views.to_string()),
            ("TOTAL_LIKES", stats.total_likes.to_string()),
            ("TOTAL_DISLIKES", stats.total_dislikes.to_string()),
            ("MOST_POPULAR", card_or_empty(stats.most_popular.as_ref())),
            ("MOST_VIEWED", card_or_empty(stats.most_viewed.as_ref())),
        ],
    );

    page("Dashboard", &content)
}
