use std::io::Write;

use crossterm::{queue, style};

/// Split a menu item into `(is_key, text)` runs. Keys are the bracketed
/// parts, brackets included; an unclosed bracket runs to the end as plain text.
pub fn menu_segments(item: &str) -> Vec<(bool, &str)> {
    let mut segments = Vec::new();
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            segments.push((false, rest));
            break;
        };
        if open > 0 {
            segments.push((false, &rest[..open]));
        }
        rest = &rest[open..];
        match rest.find(']') {
            Some(close) => {
                segments.push((true, &rest[..=close]));
                rest = &rest[close + 1..];
            }
            None => {
                segments.push((false, rest));
                break;
            }
        }
    }
    segments
}

/// Print a menu item, bolding key hints in `[...]` and dimming the rest.
pub fn print_menu_item<W: Write>(out: &mut W, item: &str) -> anyhow::Result<()> {
    for (is_key, text) in menu_segments(item) {
        let attribute = if is_key {
            style::Attribute::Bold
        } else {
            style::Attribute::Dim
        };
        queue!(
            out,
            style::SetAttribute(attribute),
            style::Print(text),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_keys_from_labels() {
        assert_eq!(
            menu_segments("[q][Esc] quit"),
            vec![(true, "[q]"), (true, "[Esc]"), (false, " quit")]
        );
        assert_eq!(
            menu_segments("turn [Left"),
            vec![(false, "turn "), (false, "[Left")]
        );
    }

    #[test]
    fn prints_into_any_writer() {
        let mut out = Vec::new();
        print_menu_item(&mut out, "[r] restart").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[r]"));
        assert!(text.contains(" restart"));
    }
}
