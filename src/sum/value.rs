//! Reading numbers and unit labels out of host display strings.
//!
//! A display string is read as a leading run of digits, signs, separators and
//! spaces, followed by a remainder. `"1 250.5 mm"` splits into `"1 250.5 "` and
//! `"mm"`.

/// Numeric value of a display string, ignoring any unit suffix.
///
/// Parsing is locale-invariant: `.` is the decimal point, while commas and
/// whitespace inside the number are digit grouping. An exponent
/// (`1.5E3`) is part of the number.
#[must_use]
pub fn parse_display_value(display: &str) -> Option<f64> {
    let (number, _) = split_numeric(display);

    let compact: String = number
        .chars()
        .filter(|&c| c != ',' && !c.is_whitespace())
        .collect();

    compact.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Unit suffix of a display string, or an empty string when there is none.
#[must_use]
pub fn unit_label(display: &str) -> String {
    let (_, rest) = split_numeric(display);
    let rest = rest.trim();

    if rest.is_empty() || parse_display_value(rest).is_some() {
        String::new()
    } else {
        rest.to_string()
    }
}

fn split_numeric(display: &str) -> (&str, &str) {
    let display = display.trim();
    let mut end = 0;
    let mut chars = display.char_indices();

    while let Some((i, c)) = chars.next() {
        if is_numeric_char(c) {
            end = i + c.len_utf8();
            continue;
        }
        let exponent = matches!(c, 'e' | 'E')
            .then(|| exponent_len(&display[i..]))
            .flatten()
            .filter(|_| display[..i].chars().any(|d| d.is_ascii_digit()));
        let Some(len) = exponent else {
            break;
        };
        end = i + len;
        // Exponent characters are ASCII
        chars.nth(len - 2);
    }

    display.split_at(end)
}

/// Length of an `e[+-]digits` exponent at the start of `s`.
fn exponent_len(s: &str) -> Option<usize> {
    let rest = &s[1..];
    let digits = rest.strip_prefix(['+', '-']).unwrap_or(rest);
    let count = digits.chars().take_while(char::is_ascii_digit).count();
    (count > 0).then_some(1 + (rest.len() - digits.len()) + count)
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ',') || c.is_whitespace()
}
