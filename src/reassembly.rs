use regex::Regex;

/// Recognized punctuation classes used for spacing decisions.
///
/// The defaults cover common English prose plus curly quotes. Both sets are
/// plain character lists so locale-specific symbols can be swapped in
/// without touching the reassembly rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    /// Symbols that must not be preceded by whitespace.
    pub closing: Vec<char>,
    /// Symbols that must not be followed by whitespace.
    pub opening: Vec<char>,
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self {
            closing: vec![
                '?', '!', '.', ',', ':', ';', '\'', '"', '\u{201d}', ')', ']', '}',
            ],
            opening: vec!['\'', '"', '\u{201c}', '\u{2018}', '(', '[', '{'],
        }
    }
}

impl SymbolSet {
    pub fn is_closing(&self, ch: char) -> bool {
        self.closing.contains(&ch)
    }

    pub fn is_opening(&self, ch: char) -> bool {
        self.opening.contains(&ch)
    }

    fn char_class(chars: &[char]) -> Option<String> {
        if chars.is_empty() {
            return None;
        }
        let mut class = String::from("[");
        for ch in chars {
            class.push_str(&regex::escape(&ch.to_string()));
        }
        class.push(']');
        Some(class)
    }
}

/// Folds decoded payloads into display-ready text increments.
///
/// The server splits a message at arbitrary token boundaries, so fragments
/// arrive with stray padding around punctuation and without reliable word
/// gaps. Each [`push`](Self::push) cleans one fragment and decides whether a
/// separating space is owed, using only the text accumulated so far.
#[derive(Debug)]
pub struct TextReassembler {
    accumulated: String,
    symbols: SymbolSet,
    apostrophe: Regex,
    before_closing: Option<Regex>,
    after_opening: Option<Regex>,
}

impl Default for TextReassembler {
    fn default() -> Self {
        Self::with_symbols(SymbolSet::default())
    }
}

impl TextReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(symbols: SymbolSet) -> Self {
        let apostrophe =
            Regex::new(r"\b\s*'\s*\b").expect("apostrophe regex must compile");
        let before_closing = SymbolSet::char_class(&symbols.closing).map(|class| {
            Regex::new(&format!(r"\s+({class})")).expect("closing regex must compile")
        });
        let after_opening = SymbolSet::char_class(&symbols.opening).map(|class| {
            Regex::new(&format!(r"({class})\s+")).expect("opening regex must compile")
        });

        Self {
            accumulated: String::new(),
            symbols,
            apostrophe,
            before_closing,
            after_opening,
        }
    }

    /// Normalize one payload and append it to the accumulated text.
    ///
    /// Returns the exact increment appended, separator included. The
    /// increment may be empty when the payload normalizes to nothing.
    pub fn push(&mut self, payload: &str) -> String {
        let cleaned = self.clean(payload);

        let mut increment = String::new();
        if self.accumulated.is_empty() {
            // A message never opens with whitespace.
            increment.push_str(cleaned.trim_start());
        } else {
            if self.needs_separator(&cleaned) {
                increment.push(' ');
            }
            increment.push_str(&cleaned);
        }

        self.accumulated.push_str(&increment);
        increment
    }

    /// The full text accumulated so far.
    pub fn text(&self) -> &str {
        &self.accumulated
    }

    pub fn into_text(self) -> String {
        self.accumulated
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    fn clean(&self, payload: &str) -> String {
        let mut cleaned = self.apostrophe.replace_all(payload, "'").into_owned();
        if let Some(rule) = &self.before_closing {
            cleaned = rule.replace_all(&cleaned, "$1").into_owned();
        }
        if let Some(rule) = &self.after_opening {
            cleaned = rule.replace_all(&cleaned, "$1").into_owned();
        }

        // Punctuation-only fragments pack tightly against what follows;
        // their padding never marks a word gap.
        if self.is_symbol_run(&cleaned) {
            let keep = cleaned.trim_end().len();
            cleaned.truncate(keep);
        }

        cleaned
    }

    /// True when the fragment holds at least one recognized symbol and
    /// nothing but symbols and whitespace.
    fn is_symbol_run(&self, cleaned: &str) -> bool {
        let mut saw_symbol = false;
        for ch in cleaned.chars() {
            if self.symbols.is_closing(ch) || self.symbols.is_opening(ch) {
                saw_symbol = true;
            } else if !ch.is_whitespace() {
                return false;
            }
        }
        saw_symbol
    }

    fn needs_separator(&self, cleaned: &str) -> bool {
        if self.accumulated.ends_with(char::is_whitespace) {
            return false;
        }
        match cleaned.chars().next() {
            Some(first) => !first.is_whitespace() && !self.symbols.is_closing(first),
            None => false,
        }
    }
}
