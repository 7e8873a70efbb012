//! Static landing page

use axum::response::Html;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Keyrelay</title>
</head>
<body>
  <h1>Keyrelay is running</h1>
  <p>Requests are forwarded to an upstream AI API with one of the keys you supply.</p>
  <ul>
    <li><code>/groq/*</code> &rarr; Groq (<code>x-groq-api-key</code> or <code>Authorization: Bearer</code>)</li>
    <li><code>*/chat/completions</code>, <code>*/completions</code>, <code>*/embeddings</code>, <code>*/models</code> &rarr; Gemini OpenAI-compatible API</li>
    <li><code>POST /verify</code> &rarr; check Gemini keys</li>
    <li>anything else &rarr; Gemini (<code>x-goog-api-key</code> or <code>Authorization: Bearer</code>)</li>
  </ul>
  <p>Several keys may be given as a comma-separated list; one is picked at random per request.</p>
</body>
</html>
"#;

/// Serve the informational page
pub fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
