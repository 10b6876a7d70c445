//! The single HTML page of the web front end and its script.

use std::borrow::Cow;

use crate::core::params::FilterParams;

const INDEX_HTML: &str = include_str!("../assets/index.html");
/// Browser script behind the live editor; talks to `/api/edit`.
pub const APP_JS: &str = include_str!("../assets/app.js");
const ROTATIONS: [i32; 4] = [0, 90, 180, 270];

/// Everything the page shows besides the static form.
#[derive(Debug, Default)]
pub struct PageView {
    /// Form values to pre-fill, so a second edit starts from the last one
    pub params: FilterParams,
    pub original: Option<String>,
    pub edited: Option<String>,
    pub download: Option<String>,
    pub notice: Option<String>,
}

impl PageView {
    pub fn render(&self) -> String {
        let notice = self
            .notice
            .as_deref()
            .map(|n| format!("<p class=\"notice\">{}</p>", escape(n)))
            .unwrap_or_default();

        let original = self
            .original
            .as_deref()
            .map(|url| figure("Original", url, None))
            .unwrap_or_default();

        let edited = self
            .edited
            .as_deref()
            .map(|url| figure("Edited", url, self.download.as_deref()))
            .unwrap_or_default();

        let rotate_options = ROTATIONS
            .iter()
            .map(|deg| {
                let selected = if *deg == self.params.rotate { " selected" } else { "" };
                format!("<option value=\"{deg}\"{selected}>{deg}°</option>")
            })
            .collect::<Vec<_>>()
            .join("\n      ");

        INDEX_HTML
            .replace("{{notice}}", &notice)
            .replace("{{brightness}}", &self.params.brightness.to_string())
            .replace("{{contrast}}", &self.params.contrast.to_string())
            .replace("{{grayscale}}", &self.params.grayscale.to_string())
            .replace("{{rotate_options}}", &rotate_options)
            .replace("{{flip_checked}}", if self.params.flip { "checked" } else { "" })
            .replace("{{original}}", &original)
            .replace("{{edited}}", &edited)
    }
}

fn figure(caption: &str, url: &str, download: Option<&str>) -> String {
    let link = download
        .map(|d| format!(" <a href=\"{}\">Download</a>", escape(d)))
        .unwrap_or_default();
    format!(
        "<figure><img src=\"{}\" alt=\"{caption} image\"><figcaption>{caption}{link}</figcaption></figure>",
        escape(url)
    )
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
