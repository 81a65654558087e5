//! Преобразование одного свободного текста в пару «заголовок + тело» и обратно.
//!
//! Первая строка текста считается заголовком, остальное телом заметки.

/// Длина превью текста в карточке списка.
pub const PREVIEW_CHARS: usize = 120;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Заголовок и тело, полученные из свободного текста.
pub struct NoteParts {
    /// Первая строка без пробелов по краям.
    pub title: String,
    /// Остальные строки без ведущих пустых строк.
    pub body: String,
}

/// Делит текст на заголовок (первая строка) и тело.
pub fn split(raw: &str) -> NoteParts {
    let normalized = raw.replace("\r\n", "\n");
    let mut lines = normalized.split('\n');

    let title = lines.next().unwrap_or_default().trim().to_string();
    let body = lines
        .skip_while(|line| line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    NoteParts { title, body }
}

/// Собирает текст из заголовка и тела.
///
/// При пустом заголовке тело возвращается как есть, поэтому
/// `split(compose("", body))` заголовок не восстанавливает.
pub fn compose(title: &str, body: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return body.to_string();
    }
    if body.trim().is_empty() {
        return title.to_string();
    }
    format!("{title}\n{body}")
}

/// Обрезает текст до `max_chars` символов и добавляет `...`.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_normalizes_crlf_and_strips_blank_lines() {
        let parts = split("Title\r\n\r\nBody");
        assert_eq!(parts.title, "Title");
        assert_eq!(parts.body, "Body");
    }

    #[test]
    fn split_trims_title_and_keeps_inner_lines() {
        let parts = split("  Shopping  \n\n \nmilk\n\neggs\n");
        assert_eq!(parts.title, "Shopping");
        assert_eq!(parts.body, "milk\n\neggs\n");
    }

    #[test]
    fn split_empty_input() {
        assert_eq!(split(""), NoteParts::default());
    }

    #[test]
    fn split_title_only() {
        let parts = split("  just a title ");
        assert_eq!(parts.title, "just a title");
        assert_eq!(parts.body, "");
    }

    #[test]
    fn split_title_is_trimmed_first_line() {
        for raw in ["a\r\nb", " x \n y", "\nbody", "one"] {
            let expected = raw.replace("\r\n", "\n");
            let expected = expected.split('\n').next().unwrap_or_default().trim();
            assert_eq!(split(raw).title, expected, "input: {raw:?}");
        }
    }

    #[test]
    fn compose_cases() {
        assert_eq!(compose("", "Body"), "Body");
        assert_eq!(compose("Title", ""), "Title");
        assert_eq!(compose("Title", "   "), "Title");
        assert_eq!(compose("Title", "Body"), "Title\nBody");
        assert_eq!(compose("  Title  ", "Body"), "Title\nBody");
    }

    #[test]
    fn compose_passes_body_through_without_title() {
        assert_eq!(compose("   ", "  \n "), "  \n ");
    }

    #[test]
    fn empty_title_round_trip_is_lossy() {
        let parts = split(&compose("", "first\nsecond"));
        assert_eq!(parts.title, "first");
        assert_eq!(parts.body, "second");
    }

    #[test]
    fn preview_truncates_by_chars() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("приветмир", 6), "привет...");
        assert_eq!(preview("exact", 5), "exact");
    }
}
