//! Typed builder for the `drawtext` filter expression.
//!
//! The expression is the only wire format crossing the engine boundary:
//!
//! ```text
//! drawtext=text='<text>':x=<x>:y=<y>:fontsize=<px>:fontcolor=<c>:bordercolor=<c>:borderw=<n>:fontfile='<path>':rotate=<deg>
//! ```
//!
//! User text passes through three parsers on its way into ffmpeg: the
//! filtergraph parser, the filter option parser, and drawtext's own text
//! expansion. [`TextPolicy::Escape`] escapes for all three;
//! [`TextPolicy::Reject`] refuses text containing anything special.

use std::path::{Path, PathBuf};

use textcast_common::config::{ExportSettings, TextPolicy};
use textcast_common::error::{TextcastError, TextcastResult};

/// Characters refused under [`TextPolicy::Reject`].
pub const UNSAFE_TEXT_CHARS: &[char] = &['\'', '\\', ':', '%', ',', ';', '[', ']'];

/// One drawtext overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawText {
    text: String,
    x: f64,
    y: f64,
    font_size: f64,
    font_color: String,
    border_color: String,
    border_width: u32,
    font_file: PathBuf,
    rotate: f64,
}

impl DrawText {
    /// Start a builder with the default white-on-black stroke styling.
    pub fn new(text: impl Into<String>) -> Self {
        let settings = ExportSettings::default();
        Self {
            text: text.into(),
            x: 0.0,
            y: 0.0,
            font_size: 24.0,
            font_color: settings.font_color,
            border_color: settings.border_color,
            border_width: settings.border_width,
            font_file: settings.font_file,
            rotate: 0.0,
        }
    }

    /// Apply the fixed styling from export settings.
    pub fn styled(self, settings: &ExportSettings) -> Self {
        self.font_color(settings.font_color.as_str())
            .border(settings.border_color.as_str(), settings.border_width)
            .font_file(&settings.font_file)
    }

    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn font_size(mut self, px: f64) -> Self {
        self.font_size = px;
        self
    }

    pub fn font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = color.into();
        self
    }

    pub fn border(mut self, color: impl Into<String>, width: u32) -> Self {
        self.border_color = color.into();
        self.border_width = width;
        self
    }

    pub fn font_file(mut self, path: impl AsRef<Path>) -> Self {
        self.font_file = path.as_ref().to_path_buf();
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    /// Render the filter expression.
    pub fn build(&self, policy: TextPolicy) -> TextcastResult<String> {
        let text = match policy {
            TextPolicy::Escape => escape_option_value(&escape_expansion(&self.text)),
            TextPolicy::Reject => {
                if let Some(ch) = self.text.chars().find(|c| UNSAFE_TEXT_CHARS.contains(c)) {
                    return Err(TextcastError::filter(format!(
                        "overlay text contains unsupported character {ch:?}"
                    )));
                }
                self.text.clone()
            }
        };

        let font_file = self.font_file.to_string_lossy().replace('\\', "/");

        Ok(format!(
            "drawtext=text={text}:x={x}:y={y}:fontsize={size}:fontcolor={fc}:bordercolor={bc}:borderw={bw}:fontfile={ff}:rotate={rot}",
            text = quote_for_graph(&text),
            x = format_number("x", self.x)?,
            y = format_number("y", self.y)?,
            size = format_number("fontsize", self.font_size)?,
            fc = color_token("fontcolor", &self.font_color)?,
            bc = color_token("bordercolor", &self.border_color)?,
            bw = self.border_width,
            ff = quote_for_graph(&escape_option_value(&font_file)),
            rot = format_number("rotate", self.rotate)?,
        ))
    }
}

/// Arguments for one engine invocation: re-encode video with `filter`,
/// copy audio unchanged.
pub fn segment_args(input_name: &str, filter: &str, output_name: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        input_name.to_string(),
        "-vf".to_string(),
        filter.to_string(),
        "-c:a".to_string(),
        "copy".to_string(),
        output_name.to_string(),
    ]
}

/// drawtext expands `\x` to `x` and `%{...}` sequences in its text.
fn escape_expansion(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// The option parser splits on `:` and honours quotes and backslashes.
fn escape_option_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        if matches!(ch, '\\' | '\'' | ':') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Single-quote for the filtergraph parser. Nothing is special inside the
/// quotes except the quote itself, which is closed, escaped, and reopened.
fn quote_for_graph(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn format_number(key: &str, value: f64) -> TextcastResult<String> {
    if !value.is_finite() {
        return Err(TextcastError::filter(format!("{key} must be finite")));
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return Ok(format!("{}", value as i64));
    }
    let fixed = format!("{value:.3}");
    Ok(fixed.trim_end_matches('0').trim_end_matches('.').to_string())
}

fn color_token(key: &str, value: &str) -> TextcastResult<String> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '@' | '.' | '_'));
    if valid {
        Ok(value.to_string())
    } else {
        Err(TextcastError::filter(format!("invalid {key} {value:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DrawText {
        DrawText::new("Hello")
            .position(120.0, 48.0)
            .font_size(24.0)
            .font_file("/font.ttf")
            .rotate(15.0)
    }

    #[test]
    fn test_expression_layout() {
        let expr = sample().build(TextPolicy::Escape).unwrap();
        assert_eq!(
            expr,
            "drawtext=text='Hello':x=120:y=48:fontsize=24:fontcolor=white:bordercolor=black:borderw=2:fontfile='/font.ttf':rotate=15"
        );
    }

    #[test]
    fn test_parameter_order() {
        let expr = sample().build(TextPolicy::Escape).unwrap();
        let keys: Vec<&str> = expr
            .trim_start_matches("drawtext=")
            .split(':')
            .filter_map(|pair| pair.split_once('=').map(|(k, _)| k))
            .collect();
        assert_eq!(
            keys,
            [
                "text",
                "x",
                "y",
                "fontsize",
                "fontcolor",
                "bordercolor",
                "borderw",
                "fontfile",
                "rotate"
            ]
        );
    }

    #[test]
    fn test_fractional_numbers_are_trimmed() {
        let expr = sample()
            .position(10.5, 0.25)
            .rotate(-0.0)
            .build(TextPolicy::Escape)
            .unwrap();
        assert!(expr.contains(":x=10.5:y=0.25:"));
        assert!(expr.ends_with(":rotate=0"));
    }

    #[test]
    fn test_quote_is_escaped_for_both_parsers() {
        let expr = DrawText::new("it's")
            .font_file("/font.ttf")
            .build(TextPolicy::Escape)
            .unwrap();
        assert!(expr.starts_with(r"drawtext=text='it\'\''s':x="));
    }

    #[test]
    fn test_colon_and_percent_are_escaped() {
        let expr = DrawText::new("10:30 100%")
            .build(TextPolicy::Escape)
            .unwrap();
        assert!(expr.starts_with(r"drawtext=text='10\:30 100\\%':x="));
    }

    #[test]
    fn test_commas_stay_inside_quotes() {
        let expr = DrawText::new("one, two").build(TextPolicy::Escape).unwrap();
        assert!(expr.starts_with("drawtext=text='one, two':"));
    }

    #[test]
    fn test_reject_policy_refuses_special_characters() {
        let err = DrawText::new("don't")
            .build(TextPolicy::Reject)
            .unwrap_err();
        assert!(err.to_string().contains("unsupported character"));
        assert!(DrawText::new("plain text").build(TextPolicy::Reject).is_ok());
    }

    #[test]
    fn test_font_path_colons_are_escaped() {
        let expr = DrawText::new("x")
            .font_file(r"C:\Fonts\arial.ttf")
            .build(TextPolicy::Escape)
            .unwrap();
        assert!(expr.contains(r"fontfile='C\:/Fonts/arial.ttf'"));
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        assert!(DrawText::new("x")
            .position(f64::NAN, 0.0)
            .build(TextPolicy::Escape)
            .is_err());
        assert!(DrawText::new("x")
            .font_color("white:alpha")
            .build(TextPolicy::Escape)
            .is_err());
    }

    #[test]
    fn test_segment_args() {
        let args = segment_args("input.mp4", "drawtext=text='a'", "output_0.mp4");
        assert_eq!(
            args,
            [
                "-i",
                "input.mp4",
                "-vf",
                "drawtext=text='a'",
                "-c:a",
                "copy",
                "output_0.mp4"
            ]
        );
    }
}
