// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print markup rendering.
//
// The composed document tree is first flattened into a fixed render context
// (the wire shape consumed by any template backend), then rendered into a
// self-contained HTML page: `@page` CSS carries the configured paper size
// and margins, every bucket becomes one sheet with a forced page break, and
// the article header sits on the article's first emitted sheet.

use chrono::SecondsFormat;
use serde::Serialize;

use umbruch_compose::{ComposedArticle, PageBucket, PaginatedDocument};
use umbruch_core::config::GeneratorConfig;
use umbruch_core::types::{Division, ElementKind};

// ---------------------------------------------------------------------------
// Render context
// ---------------------------------------------------------------------------

/// Fixed context shape handed to the markup renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub issue: IssueContext,
    pub articles: Vec<ArticleContext>,
    /// RFC 3339 generation timestamp.
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueContext {
    pub title: String,
    pub number: u32,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleContext {
    pub title: String,
    pub authors: Vec<String>,
    pub section: String,
    pub summary: Option<String>,
    pub pages: Vec<PageContext>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub page_number: u32,
    pub content: Vec<ElementContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementContext {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub content: String,
    pub name: Option<String>,
    pub division: Option<Division>,
}

impl RenderContext {
    /// Flatten a composed document into the renderer's context shape.
    pub fn from_document(document: &PaginatedDocument) -> Self {
        Self {
            issue: IssueContext {
                title: document.cover.title.clone(),
                number: document.cover.number,
                year: document.cover.year,
            },
            articles: document.articles.iter().map(article_context).collect(),
            generated_at: document
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

fn article_context(article: &ComposedArticle) -> ArticleContext {
    ArticleContext {
        title: article.header.title.clone(),
        authors: article.header.authors.clone(),
        section: article.header.section.clone(),
        summary: article.header.summary.clone(),
        pages: article.pages.iter().map(page_context).collect(),
    }
}

fn page_context(bucket: &PageBucket) -> PageContext {
    PageContext {
        page_number: bucket.page_number,
        content: bucket
            .elements
            .iter()
            .map(|element| ElementContext {
                kind: element.kind,
                content: element.content.clone(),
                name: element.name.clone(),
                division: element.division.clone(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// HTML rendering
// ---------------------------------------------------------------------------

/// Render the full print markup for a composed document.
pub fn render_html(document: &PaginatedDocument, config: &GeneratorConfig) -> String {
    let context = RenderContext::from_document(document);
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<meta name=\"generated\" content=\"{}\">\n",
        escape_html(&context.generated_at)
    ));
    html.push_str(&format!(
        "<title>{} — Nr. {}</title>\n",
        escape_html(&context.issue.title),
        context.issue.number
    ));
    html.push_str("<style>\n");
    html.push_str(&page_css(config));
    html.push_str("</style>\n</head>\n<body>\n");

    render_cover(&mut html, &context.issue);
    for article in &context.articles {
        render_article(&mut html, article);
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Print stylesheet. `print-color-adjust: exact` keeps background graphics
/// in the PDF output.
fn page_css(config: &GeneratorConfig) -> String {
    format!(
        "@page {{ size: {size}; margin: {margins}; }}\n\
         * {{ -webkit-print-color-adjust: exact; print-color-adjust: exact; }}\n\
         body {{ font-family: Georgia, 'Times New Roman', serif; margin: 0; }}\n\
         .sheet {{ page-break-after: always; }}\n\
         .cover {{ text-align: center; padding-top: 40%; }}\n\
         .cover h1 {{ font-size: 42pt; margin: 0; }}\n\
         .cover .imprint {{ font-size: 14pt; color: #444; }}\n\
         .article-header {{ border-bottom: 2px solid #000; margin-bottom: 12pt; }}\n\
         .article-header .section {{ text-transform: uppercase; letter-spacing: 2px; font-size: 9pt; }}\n\
         .article-header h2 {{ margin: 2pt 0 4pt; }}\n\
         .article-header .authors {{ font-style: italic; font-size: 10pt; }}\n\
         .article-header .summary {{ font-size: 11pt; color: #333; }}\n\
         figure {{ margin: 8pt 0; }}\n\
         figure img {{ max-width: 100%; }}\n\
         figcaption {{ font-size: 9pt; color: #555; }}\n\
         .continuation {{ border-left: 3px solid #999; padding-left: 6pt; font-style: italic; color: #555; }}\n\
         .continuation::before {{ content: 'continued overleaf — '; font-size: 8pt; text-transform: uppercase; }}\n\
         .folio {{ text-align: right; font-size: 9pt; color: #888; }}\n",
        size = config.paper_size.css_size(),
        margins = config.margins.css(),
    )
}

fn render_cover(html: &mut String, issue: &IssueContext) {
    html.push_str("<section class=\"sheet cover\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&issue.title)));
    html.push_str(&format!(
        "<p class=\"imprint\">Nr. {} · {}</p>\n",
        issue.number, issue.year
    ));
    html.push_str("</section>\n");
}

fn render_article(html: &mut String, article: &ArticleContext) {
    for (index, page) in article.pages.iter().enumerate() {
        html.push_str(&format!(
            "<section class=\"sheet\" data-page=\"{}\">\n",
            page.page_number
        ));

        // Header on the first emitted sheet, whatever its page number is.
        if index == 0 {
            render_header(html, article);
        }

        for element in &page.content {
            render_element(html, element);
        }

        html.push_str(&format!(
            "<div class=\"folio\">{}</div>\n",
            page.page_number
        ));
        html.push_str("</section>\n");
    }
}

fn render_header(html: &mut String, article: &ArticleContext) {
    html.push_str("<header class=\"article-header\">\n");
    html.push_str(&format!(
        "<p class=\"section\">{}</p>\n",
        escape_html(&article.section)
    ));
    html.push_str(&format!("<h2>{}</h2>\n", escape_html(&article.title)));
    if !article.authors.is_empty() {
        html.push_str(&format!(
            "<p class=\"authors\">{}</p>\n",
            escape_html(&article.authors.join(", "))
        ));
    }
    if let Some(summary) = &article.summary {
        html.push_str(&format!(
            "<p class=\"summary\">{}</p>\n",
            escape_html(summary)
        ));
    }
    html.push_str("</header>\n");
}

/// Render one content element into its output block.
///
/// A division renders its current-page content inline in this block; a
/// non-empty next-page part becomes a continuation annotation on the same
/// block. It is never moved into the following sheet.
fn render_element(html: &mut String, element: &ElementContext) {
    match element.kind {
        ElementKind::Title => {
            html.push_str(&format!(
                "<h3 class=\"block-title\">{}</h3>\n",
                escape_html(&element.content)
            ));
        }
        ElementKind::Paragraph => {
            html.push_str(&format!("<p>{}</p>\n", escape_html(&element.content)));
        }
        ElementKind::Image => {
            html.push_str("<figure>\n");
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">\n",
                escape_html(&element.content),
                escape_html(element.name.as_deref().unwrap_or_default())
            ));
            if let Some(name) = &element.name {
                html.push_str(&format!("<figcaption>{}</figcaption>\n", escape_html(name)));
            }
            html.push_str("</figure>\n");
        }
        ElementKind::Other => {
            html.push_str(&format!(
                "<div class=\"block\">{}</div>\n",
                escape_html(&element.content)
            ));
        }
    }

    if let Some(division) = &element.division {
        if !division.content_for_current_page.is_empty() {
            html.push_str(&format!(
                "<p class=\"divided\">{}</p>\n",
                escape_html(&division.content_for_current_page)
            ));
        }
        if !division.content_for_next_page.is_empty() {
            html.push_str(&format!(
                "<p class=\"continuation\">{}</p>\n",
                escape_html(&division.content_for_next_page)
            ));
        }
    }
}

/// Minimal HTML escaping for authored text and attribute values.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
