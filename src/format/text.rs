//! Text header encoding
//!
//! Two concerns live here:
//! - the single-byte codepage used by the acquisition software for the
//!   5120-byte text header and for fixed-length strings in the binary header
//! - rendering a parameter mapping into the `value -- field-name` text
//!   configuration format read back by the acquisition software
//!
//! Rendering takes parameters already in printable form. It never consults
//! the flag vocabularies, so it is not the inverse of
//! [`HeaderParams::decode`](super::header::HeaderParams::decode).
//!
//! Numbers print the way `serde_json` formats them, so `1e-5` comes out as
//! `0.00001` rather than the `1e-05` written by the acquisition software's
//! own tooling. Non-finite floats reach
//! the renderer as the strings `nan`, `inf` and `-inf`.

use chrono::{Local, NaiveDateTime};
use encoding_rs::{Encoding, WINDOWS_1251};
use serde_json::{Map, Value};

use crate::common::error::{RshError, RshResult};

/// Single-byte codepage for text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codepage(&'static Encoding);

impl Default for Codepage {
    fn default() -> Self {
        Self::windows_1251()
    }
}

impl Codepage {
    /// Codepage written by the Rudshel acquisition software
    pub fn windows_1251() -> Self {
        Codepage(WINDOWS_1251)
    }

    /// Look up a codepage by WHATWG label (e.g. "cp1251", "koi8-r")
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(Codepage)
    }

    /// Canonical encoding name
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Decode a NUL-padded field, dropping trailing NUL bytes
    pub fn decode_fixed(&self, bytes: &[u8]) -> String {
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let (text, _) = self.0.decode_without_bom_handling(&bytes[..end]);
        text.into_owned()
    }

    /// Encode into exactly `len` bytes, truncating or NUL-padding
    pub fn encode_fixed(&self, text: &str, len: usize) -> Vec<u8> {
        let (bytes, _, _) = self.0.encode(text);
        let mut out = vec![0u8; len];
        let n = bytes.len().min(len);
        out[..n].copy_from_slice(&bytes[..n]);
        out
    }
}

/// Render a parameter mapping as a text header, stamped with the local time
pub fn render_text_header(params: &Value) -> RshResult<String> {
    render_text_header_at(params, Local::now().naive_local())
}

/// Render a parameter mapping as a text header with an explicit timestamp
///
/// `params` must be a JSON object. Each leaf field becomes one
/// `value -- field-name` line, in the object's key order:
/// - `channel` is an array of objects rendered as `channel_<field>[i]`,
///   with `params` renamed to `channels_params[i]`
/// - `synchro_channel` is an object rendered as `synchro_channel_<field>`,
///   with `type` rendered as bare `synchro_channel`
pub fn render_text_header_at(params: &Value, generated_at: NaiveDateTime) -> RshResult<String> {
    let params = as_object(params, "parameters")?;

    let mut out = format!(
        "// Generated at {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S%.6f")
    );

    for (key, value) in params {
        match key.as_str() {
            "channel" => {
                let channels = value
                    .as_array()
                    .ok_or_else(|| RshError::invalid_params("'channel' must be an array"))?;
                for (i, channel) in channels.iter().enumerate() {
                    for (field, v) in as_object(channel, "channel entry")? {
                        let name = if field == "params" {
                            format!("channels_params[{i}]")
                        } else {
                            format!("channel_{field}[{i}]")
                        };
                        push_line(&mut out, &name, v);
                    }
                }
            }
            "synchro_channel" => {
                for (field, v) in as_object(value, "synchro_channel")? {
                    if field == "type" {
                        push_line(&mut out, "synchro_channel", v);
                    } else {
                        push_line(&mut out, &format!("synchro_channel_{field}"), v);
                    }
                }
            }
            _ => push_line(&mut out, key, value),
        }
    }

    Ok(out)
}

fn as_object<'a>(value: &'a Value, what: &str) -> RshResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| RshError::invalid_params(format!("{what} must be an object")))
}

fn push_line(out: &mut String, field: &str, value: &Value) {
    out.push_str(&render_value(value));
    out.push_str(" -- ");
    out.push_str(field);
    out.push('\n');
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
