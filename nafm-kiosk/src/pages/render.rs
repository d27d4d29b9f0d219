//! Shared HTML scaffolding

use nafm_common::navigation::{PageKind, PageUrl};
use std::fmt::Write;

const SITE_NAME: &str = "Nigerian Air Force Museum";

/// Escape text for HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Image or logo path from the content document, served from `/assets`
pub fn asset_src(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') || path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("/assets/{}", path)
    }
}

/// Subscription URL for a page
pub fn events_url(url: &PageUrl) -> String {
    let query = url.query_string();
    if query.is_empty() {
        format!("/events?page={}", url.kind.as_str())
    } else {
        format!("/events?page={}&{}", url.kind.as_str(), query)
    }
}

/// Link to a local interaction carrying the page's state
pub fn interact_url(action: &str, url: &PageUrl, extra: &[(&str, String)]) -> String {
    let mut link = format!("/interact/{}?page={}", action, url.kind.as_str());
    let query = url.query_string();
    if !query.is_empty() {
        link.push('&');
        link.push_str(&query);
    }
    for (key, value) in extra {
        let _ = write!(link, "&{}={}", key, value);
    }
    link
}

/// Full document around `body`
///
/// `subscribe` wires the page to its event stream; error pages pass `None`.
pub fn document(title: &str, kind: PageKind, subscribe: Option<&PageUrl>, body: &str) -> String {
    let events = subscribe
        .map(|url| format!(" data-events=\"{}\"", escape(&events_url(url))))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - {site}</title>
<link rel="stylesheet" href="/static/kiosk.css">
</head>
<body class="page-{kind}"{events}>
<header class="kiosk-header">
<span class="kiosk-brand">{site}</span>
<span id="connection-status" class="connection-status connected" aria-live="polite">Connected</span>
</header>
<main id="main-container">
{body}
</main>
<div id="feedback" class="feedback" role="status" hidden></div>
<script src="/static/kiosk.js"></script>
</body>
</html>
"#,
        title = escape(title),
        site = SITE_NAME,
        kind = kind.as_str(),
        events = events,
        body = body,
    )
}

/// Readable error body with a manual retry link
pub fn error_body(heading: &str, message: &str, retry: Option<&str>) -> String {
    let retry = retry
        .map(|href| format!(r#"<a class="button retry" href="{}">Retry</a>"#, escape(href)))
        .unwrap_or_default();
    format!(
        r#"<section class="error-message">
<h2>{}</h2>
<p>{}</p>
{}
<a class="button" href="/">Back to the museum</a>
</section>"#,
        escape(heading),
        escape(message),
        retry
    )
}
