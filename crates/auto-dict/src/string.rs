use lazy_static::lazy_static;
use regex::Regex;

pub use ecow::EcoString as AutoStr;

lazy_static! {
    static ref IDENT: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Whether `name` could be written as an attribute, e.g. `d.name`.
pub fn is_identifier(name: &str) -> bool {
    IDENT.is_match(name)
}

pub trait StrExt {
    /// Quote the text the way a dict repr shows string keys and values.
    fn quoted(&self) -> AutoStr;
}

impl StrExt for str {
    fn quoted(&self) -> AutoStr {
        let quote = if self.contains('\'') && !self.contains('"') {
            '"'
        } else {
            '\''
        };
        let mut out = AutoStr::new();
        out.push(quote);
        for c in self.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\r' => out.push_str("\\r"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}
