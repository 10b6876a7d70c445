//! Minimal `multipart/form-data` body parser for the upload forms.
//!
//! Works on a fully buffered body (size-capped by the caller). Parts with a
//! `filename` parameter are files, everything else is a UTF-8 text field.

use crate::error::{Error, Result};

/// An uploaded file part.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, String)>,
    files: Vec<(String, FilePart)>,
}

impl FormData {
    /// Last value submitted under `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// First file submitted under `name` that actually has a filename.
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.files
            .iter()
            .find(|(n, f)| n == name && !f.filename.is_empty())
            .map(|(_, f)| f)
    }
}

/// Extract the boundary from a `Content-Type: multipart/form-data; boundary=...` value.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let mut params = split_params(content_type).into_iter();
    let kind = params.next()?;
    if !kind.trim().eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    params
        .filter_map(|p| key_value(&p))
        .find(|(k, _)| k.eq_ignore_ascii_case("boundary"))
        .map(|(_, v)| v)
        .filter(|b| !b.is_empty())
}

pub fn parse(body: &[u8], boundary: &str) -> Result<FormData> {
    let delimiter = format!("--{boundary}").into_bytes();
    let mut part_end = Vec::with_capacity(delimiter.len() + 2);
    part_end.extend_from_slice(b"\r\n");
    part_end.extend_from_slice(&delimiter);

    let start = find(body, &delimiter, 0)
        .ok_or_else(|| Error::Request("multipart body does not contain the boundary".into()))?;
    let mut cursor = start + delimiter.len();
    let mut form = FormData::default();

    loop {
        let rest = &body[cursor..];
        if rest.is_empty() || rest.starts_with(b"--") {
            break;
        }
        if !rest.starts_with(b"\r\n") {
            return Err(Error::Request("malformed multipart delimiter".into()));
        }
        cursor += 2;

        let header_end = find(body, b"\r\n\r\n", cursor)
            .ok_or_else(|| Error::Request("multipart part without header terminator".into()))?;
        let headers = String::from_utf8_lossy(&body[cursor..header_end]);
        let content_start = header_end + 4;
        let content_end = find(body, &part_end, content_start)
            .ok_or_else(|| Error::Request("unterminated multipart part".into()))?;
        let content = &body[content_start..content_end];
        cursor = content_end + part_end.len();

        let part = PartHeaders::parse(&headers);
        let Some(name) = part.name else {
            continue;
        };
        match part.filename {
            Some(filename) => form.files.push((
                name,
                FilePart {
                    filename,
                    content_type: part.content_type,
                    data: content.to_vec(),
                },
            )),
            None => form
                .fields
                .push((name, String::from_utf8_lossy(content).into_owned())),
        }
    }

    Ok(form)
}

#[derive(Default)]
struct PartHeaders {
    name: Option<String>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl PartHeaders {
    fn parse(block: &str) -> Self {
        let mut out = Self::default();
        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.eq_ignore_ascii_case("content-disposition") {
                for param in split_params(value).into_iter().skip(1) {
                    match key_value(&param) {
                        Some((k, v)) if k.eq_ignore_ascii_case("name") => out.name = Some(v),
                        Some((k, v)) if k.eq_ignore_ascii_case("filename") => {
                            out.filename = Some(v)
                        }
                        _ => {}
                    }
                }
            } else if key.eq_ignore_ascii_case("content-type") {
                out.content_type = Some(value.trim().to_string());
            }
        }
        out
    }
}

/// Split a header value on `;`, ignoring separators inside double quotes.
fn split_params(value: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in value.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ';' if !in_quotes => params.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    params.push(current);
    params
}

fn key_value(param: &str) -> Option<(String, String)> {
    let (key, value) = param.split_once('=')?;
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some((key.trim().to_string(), value.to_string()))
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
