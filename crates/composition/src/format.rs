//! printf-style formatting of JSON values.
//!
//! Supports the flags `-`, `+`, `#`, `0` and space, an optional width and
//! precision, and the verbs `%v %s %q %d %b %o %x %X %f %F %e %E %g %G %t`
//! plus `%%`. Formatting never fails: problems are rendered inline, e.g.
//! `%!d(string=abc)` for a verb that does not fit its operand,
//! `%!s(MISSING)` for an absent operand and `%!(EXTRA int=3)` for operands
//! the template never consumed. A width or precision above
//! [`MAX_WIDTH`] renders `%!(BADWIDTH)` or `%!(BADPREC)` and is ignored.

use std::fmt::Write as _;
use std::iter::Peekable;
use std::str::Chars;

use itertools::Itertools;
use serde_json::Value;

use crate::value::kind_name;

/// Largest width or precision a template may request.
pub const MAX_WIDTH: usize = 1_000_000;

/// Digits after which every `f64` expansion is all zeros.
const EXACT_DIGITS: usize = 1100;

/// Format `args` into `template`.
pub fn sprintf(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let spec = Spec::parse(&mut chars);
        if spec.bad_width {
            out.push_str("%!(BADWIDTH)");
        }
        if spec.bad_precision {
            out.push_str("%!(BADPREC)");
        }
        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        match args.get(next_arg) {
            Some(arg) => out.push_str(&spec.render(verb, arg)),
            None => {
                let _ = write!(out, "%!{verb}(MISSING)");
            }
        }
        next_arg = next_arg.saturating_add(1);
    }

    if let Some(extra) = args.get(next_arg..).filter(|rest| !rest.is_empty()) {
        let listed = extra
            .iter()
            .map(|v| format!("{}={}", kind_name(v), display(v)))
            .join(", ");
        let _ = write!(out, "%!(EXTRA {listed})");
    }
    out
}

/// Render a value the way `%v` does.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => "<nil>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => format_general(f, None, false),
            (None, None, None) => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    plus: bool,
    sharp: bool,
    zero: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
    bad_width: bool,
    bad_precision: bool,
}

impl Spec {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Self {
        let mut spec = Self::default();
        while let Some(&c) = chars.peek() {
            match c {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '#' => spec.sharp = true,
                '0' => spec.zero = true,
                ' ' => spec.space = true,
                _ => break,
            }
            chars.next();
        }
        match read_number(chars) {
            Some(width) if width > MAX_WIDTH => spec.bad_width = true,
            width => spec.width = width,
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            match read_number(chars).unwrap_or(0) {
                precision if precision > MAX_WIDTH => spec.bad_precision = true,
                precision => spec.precision = Some(precision),
            }
        }
        spec
    }

    fn render(&self, verb: char, arg: &Value) -> String {
        let rendered = match (verb, arg) {
            ('v', _) => Some((display(arg), numeric(arg))),
            ('s', _) => Some((self.truncate(display(arg)), false)),
            ('q', Value::String(s)) => Some((serde_json::to_string(s).unwrap_or_default(), false)),
            ('t', Value::Bool(b)) => Some((b.to_string(), false)),
            ('d' | 'b' | 'o' | 'x' | 'X', Value::Number(n)) => {
                n.as_i64().map(|i| (self.integer(verb, i), true))
            }
            ('x' | 'X', Value::String(s)) => Some((hex_bytes(s, verb == 'X'), false)),
            ('f' | 'F' | 'e' | 'E' | 'g' | 'G', Value::Number(n)) if n.is_f64() => {
                n.as_f64().map(|f| (self.float(verb, f), true))
            }
            _ => None,
        };

        match rendered {
            Some((text, is_numeric)) => self.pad(text, is_numeric),
            None => bad_verb(verb, arg),
        }
    }

    fn truncate(&self, text: String) -> String {
        match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text,
        }
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    fn integer(&self, verb: char, i: i64) -> String {
        let magnitude = i.unsigned_abs();
        let (prefix, digits) = match verb {
            'b' => ("0b", format!("{magnitude:b}")),
            'o' => ("0", format!("{magnitude:o}")),
            'x' => ("0x", format!("{magnitude:x}")),
            'X' => ("0X", format!("{magnitude:X}")),
            _ => ("", magnitude.to_string()),
        };
        let prefix = if self.sharp { prefix } else { "" };
        format!("{}{prefix}{digits}", self.sign(i < 0))
    }

    fn float(&self, verb: char, f: f64) -> String {
        let body = match verb {
            'e' | 'E' => format_exponent(f.abs(), self.precision.unwrap_or(6), verb == 'E'),
            'g' | 'G' => format_general(f.abs(), self.precision, verb == 'G'),
            _ => format_fixed(f.abs(), self.precision.unwrap_or(6)),
        };
        format!("{}{body}", self.sign(f.is_sign_negative()))
    }

    fn pad(&self, text: String, is_numeric: bool) -> String {
        let Some(width) = self.width else {
            return text;
        };
        let fill = width.saturating_sub(text.chars().count());
        if fill == 0 {
            return text;
        }
        if self.minus {
            return format!("{text}{}", " ".repeat(fill));
        }
        if self.zero && is_numeric {
            let sign_len = usize::from(text.starts_with(['-', '+', ' ']));
            let (sign, digits) = text.split_at(sign_len);
            return format!("{sign}{}{digits}", "0".repeat(fill));
        }
        format!("{}{text}", " ".repeat(fill))
    }
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        let digit = usize::try_from(digit).unwrap_or(0);
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit),
        );
    }
    value
}

fn numeric(value: &Value) -> bool {
    matches!(value, Value::Number(_))
}

fn bad_verb(verb: char, arg: &Value) -> String {
    if arg.is_null() {
        return format!("%!{verb}(<nil>)");
    }
    format!("%!{verb}({}={})", kind_name(arg), display(arg))
}

fn hex_bytes(s: &str, upper: bool) -> String {
    s.bytes().fold(String::with_capacity(s.len().saturating_mul(2)), |mut out, b| {
        let _ = if upper {
            write!(out, "{b:02X}")
        } else {
            write!(out, "{b:02x}")
        };
        out
    })
}

/// Split Rust's `{:e}` rendering into mantissa and decimal exponent.
fn split_exponent(rendered: &str) -> (&str, i32) {
    match rendered.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (rendered, 0),
    }
}

fn join_exponent(mantissa: &str, exp: i32, upper: bool) -> String {
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.unsigned_abs())
}

/// `f` with `precision` decimals. Digits past [`EXACT_DIGITS`] are zeros.
fn format_fixed(f: f64, precision: usize) -> String {
    let exact = precision.min(EXACT_DIGITS);
    let mut out = format!("{f:.exact$}");
    out.extend(std::iter::repeat_n('0', precision.saturating_sub(exact)));
    out
}

/// Mantissa with `precision` decimals and the decimal exponent of `f`.
fn scientific(f: f64, precision: usize) -> (String, i32) {
    let exact = precision.min(EXACT_DIGITS);
    let rendered = format!("{f:.exact$e}");
    let (mantissa, exp) = split_exponent(&rendered);
    let mut mantissa = mantissa.to_string();
    mantissa.extend(std::iter::repeat_n('0', precision.saturating_sub(exact)));
    (mantissa, exp)
}

fn format_exponent(f: f64, precision: usize, upper: bool) -> String {
    let (mantissa, exp) = scientific(f, precision);
    join_exponent(&mantissa, exp, upper)
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `%g`: scientific notation for large or small exponents, plain otherwise.
///
/// Without a precision the shortest round-trip digits are used and the
/// switch to scientific notation happens at an exponent of 6.
fn format_general(f: f64, precision: Option<usize>, upper: bool) -> String {
    match precision {
        None => {
            let rendered = format!("{f:e}");
            let (mantissa, exp) = split_exponent(&rendered);
            if !(-4..6).contains(&exp) {
                join_exponent(mantissa, exp, upper)
            } else {
                f.to_string()
            }
        }
        Some(p) => {
            let significant = p.max(1);
            let digits_after_point = significant.saturating_sub(1);
            let (mantissa, exp) = scientific(f, digits_after_point);
            let limit = i32::try_from(significant).unwrap_or(i32::MAX);
            if exp < -4 || exp >= limit {
                join_exponent(trim_fraction(&mantissa), exp, upper)
            } else {
                let decimals = usize::try_from(limit.saturating_sub(1).saturating_sub(exp)).unwrap_or(0);
                trim_fraction(&format_fixed(f, decimals)).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_substitution() {
        assert_eq!(sprintf("%s-%s", &[json!("a"), json!("b")]), "a-b");
        assert_eq!(sprintf("db-%v", &[json!(3)]), "db-3");
        assert_eq!(sprintf("100%%", &[]), "100%");
    }

    #[test]
    fn test_string_verb_prints_scalars_plainly() {
        assert_eq!(sprintf("%s", &[json!(3)]), "3");
        assert_eq!(sprintf("%s/%v", &[json!(true), json!(2.5)]), "true/2.5");
        assert_eq!(sprintf("%.1s", &[json!(42)]), "4");
    }

    #[test]
    fn test_integer_verbs() {
        assert_eq!(sprintf("%d", &[json!(-42)]), "-42");
        assert_eq!(sprintf("%+d", &[json!(42)]), "+42");
        assert_eq!(sprintf("%05d", &[json!(-42)]), "-0042");
        assert_eq!(sprintf("%x", &[json!(255)]), "ff");
        assert_eq!(sprintf("%#X", &[json!(255)]), "0XFF");
        assert_eq!(sprintf("%b", &[json!(5)]), "101");
        assert_eq!(sprintf("%o", &[json!(8)]), "10");
    }

    #[test]
    fn test_float_verbs() {
        assert_eq!(sprintf("%f", &[json!(1.5)]), "1.500000");
        assert_eq!(sprintf("%.2f", &[json!(3.14159)]), "3.14");
        assert_eq!(sprintf("%e", &[json!(1234.5678)]), "1.234568e+03");
        assert_eq!(sprintf("%E", &[json!(0.00012)]), "1.200000E-04");
        assert_eq!(sprintf("%g", &[json!(0.5)]), "0.5");
        assert_eq!(sprintf("%.3g", &[json!(1234.5678)]), "1.23e+03");
        assert_eq!(sprintf("%.3g", &[json!(12.0)]), "12");
    }

    #[test]
    fn test_default_float_display() {
        assert_eq!(display(&json!(2.5)), "2.5");
        assert_eq!(display(&json!(100000.0)), "100000");
        assert_eq!(display(&json!(1000000.0)), "1e+06");
        assert_eq!(display(&json!(0.00001)), "1e-05");
    }

    #[test]
    fn test_string_verbs() {
        assert_eq!(sprintf("%q", &[json!("hi")]), "\"hi\"");
        assert_eq!(sprintf("%.3s", &[json!("abcdef")]), "abc");
        assert_eq!(sprintf("%x", &[json!("hi")]), "6869");
        assert_eq!(sprintf("%t", &[json!(true)]), "true");
    }

    #[test]
    fn test_width_and_alignment() {
        assert_eq!(sprintf("[%5s]", &[json!("ab")]), "[   ab]");
        assert_eq!(sprintf("[%-5s]", &[json!("ab")]), "[ab   ]");
        assert_eq!(sprintf("[%05s]", &[json!("ab")]), "[   ab]");
        assert_eq!(sprintf("[%6.2f]", &[json!(3.14159)]), "[  3.14]");
    }

    #[test]
    fn test_compound_values_render_as_json() {
        assert_eq!(sprintf("%v", &[json!({"a": 1})]), r#"{"a":1}"#);
        assert_eq!(sprintf("%s", &[json!([1, "x"])]), r#"[1,"x"]"#);
        assert_eq!(sprintf("%v", &[json!(null)]), "<nil>");
    }

    #[test]
    fn test_verb_mismatch() {
        assert_eq!(sprintf("%d", &[json!("abc")]), "%!d(string=abc)");
        assert_eq!(sprintf("%t", &[json!(1)]), "%!t(int=1)");
        assert_eq!(sprintf("%f", &[json!(1)]), "%!f(int=1)");
        assert_eq!(sprintf("%d", &[json!(null)]), "%!d(<nil>)");
    }

    #[test]
    fn test_missing_and_extra_operands() {
        assert_eq!(sprintf("%s-%s", &[json!("a")]), "a-%!s(MISSING)");
        assert_eq!(
            sprintf("static", &[json!("a"), json!(2)]),
            "static%!(EXTRA string=a, int=2)"
        );
        assert_eq!(sprintf("trailing %", &[]), "trailing %!(NOVERB)");
    }

    #[test]
    fn test_oversized_width_and_precision_are_rejected() {
        assert_eq!(
            sprintf("%99999999999999999999s", &[json!("a")]),
            "%!(BADWIDTH)a"
        );
        assert_eq!(
            sprintf("[%.2000000f]", &[json!(1.5)]),
            "[%!(BADPREC)1.500000]"
        );
        assert_eq!(
            sprintf("%1000001.1000001d", &[json!(7)]),
            "%!(BADWIDTH)%!(BADPREC)7"
        );
    }

    #[test]
    fn test_large_precision_pads_with_zeros() {
        let fixed = sprintf("%.70000f", &[json!(1.5)]);
        assert_eq!(fixed.len(), 70_002);
        assert!(fixed.starts_with("1.5000"));
        assert!(fixed.trim_start_matches("1.5").chars().all(|c| c == '0'));

        let expected = format!("1.{}e+00", "0".repeat(1200));
        assert_eq!(sprintf("%.1200e", &[json!(1.0)]), expected);

        assert_eq!(sprintf("%.5000g", &[json!(0.25)]), "0.25");
    }

    #[test]
    fn test_width_at_limit_is_padded() {
        let padded = sprintf("%1000000s", &[json!("a")]);
        assert_eq!(padded.len(), MAX_WIDTH);
        assert!(padded.ends_with(" a"));
    }
}
