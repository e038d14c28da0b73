use rust_decimal::Decimal;

/// Format a capacity amount with thousand separators and up to 2 decimal
/// places, e.g. `1234.5` → `"1,234.5"`, `-2` → `"-2"`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs().round_dp(2).normalize();
    let formatted = abs.to_string();
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next();

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < Decimal::ZERO && abs > Decimal::ZERO {
        "-"
    } else {
        ""
    };
    match dec_part {
        Some(frac) => format!("{sign}{with_commas}.{frac}"),
        None => format!("{sign}{with_commas}"),
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Cursor line and first visible line of a scrollable list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ListScroll {
    pub(crate) cursor: usize,
    pub(crate) offset: usize,
}

impl ListScroll {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move down one line, keeping the cursor inside a `page`-line viewport.
    pub(crate) fn down(&mut self, len: usize, page: usize) {
        if self.cursor + 1 >= len {
            return;
        }
        self.cursor += 1;
        let page = page.max(1);
        if self.cursor >= self.offset + page {
            self.offset = self.cursor + 1 - page;
        }
    }

    pub(crate) fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.offset = self.offset.min(self.cursor);
    }

    pub(crate) fn half_page_down(&mut self, len: usize, page: usize) {
        for _ in 0..(page / 2).max(1) {
            self.down(len, page);
        }
    }

    pub(crate) fn half_page_up(&mut self, page: usize) {
        for _ in 0..(page / 2).max(1) {
            self.up();
        }
    }

    pub(crate) fn bottom(&mut self, len: usize, page: usize) {
        if len > 0 {
            self.cursor = len - 1;
            self.offset = self.cursor.saturating_sub(page.max(1) - 1);
        }
    }
}
