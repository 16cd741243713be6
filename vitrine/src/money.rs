/// Thousands separator used by the fr-FR locale.
const GROUP_SEPARATOR: char = '\u{202F}';
/// Space between the amount and the currency sign.
const CURRENCY_SPACE: char = '\u{00A0}';

/// Formats whole euros the way the site displays balances: `1 234 €`.
pub fn format_eur(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3 + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out.push(CURRENCY_SPACE);
    out.push('€');
    out
}
