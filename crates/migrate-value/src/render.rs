//! Human-readable rendering of values
//!
//! Output follows the familiar REPL inspection format: strings are quoted,
//! arrays print as `[ 1, 2 ]`, objects as `{ a: 1 }`, functions as
//! `[Function: name]`, and self-references as `[Circular]`.

use crate::value::{ChainWrapper, Function, Value};
use serde::{Deserialize, Serialize};

/// Bounds applied when rendering values for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Maximum rendered length in characters, omission included
    pub max_length: usize,

    /// Marker appended to truncated output
    pub omission: String,

    /// Nesting depth beyond which containers collapse to `[Array]`/`[Object]`
    pub depth: usize,
}

impl RenderOptions {
    /// With maximum length
    #[inline]
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// With nesting depth
    #[inline]
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_length: 80,
            omission: "...".to_string(),
            depth: 2,
        }
    }
}

/// Render a value with default depth
#[must_use]
pub fn inspect(value: &Value) -> String {
    inspect_with(value, &RenderOptions::default())
}

/// Render a value
#[must_use]
pub fn inspect_with(value: &Value, options: &RenderOptions) -> String {
    let mut out = String::new();
    Inspector::new(options).write(&mut out, value, 0);
    out
}

/// Render an argument list as it would appear between call parentheses
///
/// `[5, 10]` renders as `5, 10`.
#[must_use]
pub fn inspect_args(args: &[Value], options: &RenderOptions) -> String {
    let mut inspector = Inspector::new(options);
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        inspector.write(&mut out, arg, 1);
    }
    out
}

/// Bound `text` to `options.max_length` characters
#[must_use]
pub fn truncate(text: &str, options: &RenderOptions) -> String {
    if text.chars().count() <= options.max_length {
        return text.to_string();
    }
    let keep = options
        .max_length
        .saturating_sub(options.omission.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(&options.omission);
    out
}

/// Format a number the way a JavaScript engine prints it
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    // shortest round-trip digits; exponent form below 1e-6 and from 1e21
    let scientific = format!("{n:e}");
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if exponent >= 21 {
                return format!("{mantissa}e+{exponent}");
            }
            if exponent < -6 {
                return format!("{mantissa}e{exponent}");
            }
        }
    }
    format!("{n}")
}

struct Inspector<'a> {
    options: &'a RenderOptions,
    stack: Vec<usize>,
}

impl<'a> Inspector<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
        }
    }

    fn write(&mut self, out: &mut String, value: &Value, level: usize) {
        match value {
            Value::Undefined => out.push_str("undefined"),
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&format_number(*n)),
            Value::String(s) => write_quoted(out, s),
            Value::Function(f) => write_function(out, f),
            Value::Symbol(s) => {
                out.push_str("Symbol(");
                out.push_str(s.description());
                out.push(')');
            }
            Value::Opaque(o) => {
                out.push('[');
                out.push_str(o.type_name());
                out.push(']');
            }
            Value::Array(array) => {
                if self.stack.contains(&array.id()) {
                    out.push_str("[Circular]");
                    return;
                }
                let items = array.items();
                if items.is_empty() {
                    out.push_str("[]");
                    return;
                }
                if level > self.options.depth {
                    out.push_str("[Array]");
                    return;
                }
                self.stack.push(array.id());
                out.push_str("[ ");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(out, item, level + 1);
                }
                out.push_str(" ]");
                self.stack.pop();
            }
            Value::Object(object) => {
                if self.stack.contains(&object.id()) {
                    out.push_str("[Circular]");
                    return;
                }
                let entries = object.entries();
                if entries.is_empty() {
                    out.push_str("{}");
                    return;
                }
                if level > self.options.depth {
                    out.push_str("[Object]");
                    return;
                }
                self.stack.push(object.id());
                out.push_str("{ ");
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_key(out, key);
                    out.push_str(": ");
                    self.write(out, item, level + 1);
                }
                out.push_str(" }");
                self.stack.pop();
            }
            Value::Wrapper(wrapper) => self.write_wrapper(out, wrapper, level),
        }
    }

    fn write_wrapper(&mut self, out: &mut String, wrapper: &ChainWrapper, level: usize) {
        out.push_str("Wrapper { __wrapped__: ");
        self.write(out, &wrapper.wrapped, level + 1);
        out.push_str(", __chain__: ");
        out.push_str(if wrapper.chain_all { "true" } else { "false" });
        out.push_str(" }");
    }
}

fn write_function(out: &mut String, function: &Function) {
    match function.name() {
        Some(name) if !name.is_empty() => {
            out.push_str("[Function: ");
            out.push_str(name);
            out.push(']');
        }
        _ => out.push_str("[Function (anonymous)]"),
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

fn write_key(out: &mut String, key: &str) {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}
