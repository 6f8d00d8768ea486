// Emoji-only post sanitizing.
//
// Emoji-mode confessions keep only pictographic characters and spaces. The
// ranges are deliberately broad (symbols, dingbats, the supplementary
// pictograph planes, joiners and variation selectors) so compound emoji like
// flags and family sequences survive intact.

use std::sync::OnceLock;

use regex_lite::Regex;

fn emoji_regex() -> &'static Regex {
    static EMOJI: OnceLock<Regex> = OnceLock::new();
    EMOJI.get_or_init(|| {
        Regex::new(r"[\x{00A9}\x{00AE}\x{2000}-\x{3300}\x{FE0F}\x{1F000}-\x{1FAFF}\x{E0020}-\x{E007F} ]")
            .unwrap_or_else(|e| unreachable!("emoji pattern is a constant: {e}"))
    })
}

/// Strip everything that isn't an emoji (or a space) from `text`.
pub fn retain_emoji(text: &str) -> String {
    emoji_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}
