use crate::tools::{extract_string_arg, extract_usize_arg_opt};
use crate::traits::Tool;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

const DEFAULT_MAX_CHARS: usize = 20_000;

pub struct WebsiteFetcher {
    client: reqwest::Client,
}

impl WebsiteFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("taskpilot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

impl Default for WebsiteFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebsiteFetcher {
    fn name(&self) -> &str {
        "fetch_website"
    }

    fn description(&self) -> &str {
        "Fetch a web page and return its readable text content"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to fetch"
                },
                "max_chars": {
                    "type": "integer",
                    "description": "Maximum number of characters to return (default 20000)"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<String> {
        let url = extract_string_arg(&args, "url")?;
        let max_chars = extract_usize_arg_opt(&args, "max_chars", DEFAULT_MAX_CHARS);

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Ok(format!("Error: Unsupported URL '{}'", url));
        }

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(format!("Error: Failed to fetch {}: {}", url, e)),
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(format!("Error: HTTP {} fetching {}", status, url));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Ok(format!("Error: Failed to read body of {}: {}", url, e)),
        };

        let text = if content_type.contains("text/html") {
            extract_text_from_html(&body)
        } else {
            body
        };

        Ok(truncate_chars(&text, max_chars))
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    format!(
        "{}... [content truncated, showing first {} chars]",
        truncated, max_chars
    )
}

fn strip_blocks(html: &str, open: &str, close: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with the original.
    let lower = html.to_ascii_lowercase();
    let mut text = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(start) = lower[pos..].find(open).map(|i| pos + i) {
        let Some(end) = lower[start..].find(close).map(|i| start + i + close.len()) else {
            break;
        };
        text.push_str(&html[pos..start]);
        pos = end;
    }

    text.push_str(&html[pos..]);
    text
}

fn extract_text_from_html(html: &str) -> String {
    let text = strip_blocks(html, "<script", "</script>");
    let text = strip_blocks(&text, "<style", "</style>");

    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    let collapsed = result.split_whitespace().collect::<Vec<_>>().join(" ");
    html_decode(&collapsed)
}

fn html_decode(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_is_reduced_to_text() {
        let html = r#"<html><head><style>body { color: red; }</style>
            <script>alert("hi")</script></head>
            <body><h1>Title</h1><p>Fish &amp; chips</p></body></html>"#;

        assert_eq!(extract_text_from_html(html), "Title Fish & chips");
    }

    #[test]
    fn script_and_style_blocks_are_stripped_regardless_of_case() {
        let html = "<P>before</P><SCRIPT type=\"text/javascript\">var x = 1;</Script>\
            <Style>p { margin: 0 }</STYLE><p>after</p><script>tail()</script>";

        assert_eq!(extract_text_from_html(html), "before after");
    }

    #[test]
    fn unterminated_block_is_left_in_place() {
        assert_eq!(
            strip_blocks("keep <script>never closed", "<script", "</script>"),
            "keep <script>never closed"
        );
    }

    #[test]
    fn long_text_is_truncated_on_char_boundaries() {
        let text = "héllo wörld";
        assert_eq!(
            truncate_chars(text, 4),
            "héll... [content truncated, showing first 4 chars]"
        );
        assert_eq!(truncate_chars(text, 100), text);
    }

    #[tokio::test]
    async fn rejects_non_http_urls_as_text() {
        let output = WebsiteFetcher::new()
            .execute(json!({"url": "file:///etc/passwd"}))
            .await
            .unwrap();
        assert_eq!(output, "Error: Unsupported URL 'file:///etc/passwd'");
    }

    #[tokio::test]
    async fn unreachable_host_is_reported_as_text() {
        let output = WebsiteFetcher::new()
            .execute(json!({"url": "http://127.0.0.1:1/"}))
            .await
            .unwrap();

        assert!(
            output.starts_with("Error: Failed to fetch http://127.0.0.1:1/"),
            "{output}"
        );
    }
}
