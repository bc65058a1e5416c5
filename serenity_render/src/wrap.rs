use crate::measure::TextMeasure;

/// Greedy single-pass line wrapper.
///
/// Splits `text` on whitespace and packs words left to right, starting a
/// new line as soon as appending the next word would push the rendered
/// width past `max_width`. A word that is wider than `max_width` on its
/// own is still emitted, unsplit, as the sole content of a line; never
/// hyphenated, never truncated.
///
/// Joining the returned lines with single spaces reproduces the input's
/// word sequence exactly. Each word costs one width measurement, there is
/// no backtracking.
pub fn wrap_text<M>(text: &str, measure: &M, max_width: f32) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measure.text_width(&candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
