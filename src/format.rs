/// Insert thousands separators into the integer part of a number.
///
/// The fractional part is kept as written: `1234567.89` becomes
/// `"1,234,567.89"` and values under 1000 are unchanged.
pub fn add_commas(value: f64) -> String {
    group_thousands(&value.to_string())
}

/// Same as [`add_commas`] for text that is already a number.
pub fn group_thousands(text: &str) -> String {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return text.to_string();
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
