use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns. Wide and fullwidth glyphs
/// count two columns, combining marks none.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

const TAB_SIZE: usize = 8;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Greedy word wrapper that measures display columns instead of `char`s.
/// Words longer than the width are broken; whitespace at line edges is
/// dropped.
#[derive(Debug, Clone)]
pub struct TextWrapper {
    pub width: usize,
}

impl TextWrapper {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }

    /// Wrap every source line on its own so that line breaks written by the
    /// author survive. Blank source lines become empty lines.
    pub fn wrap_preserving_breaks(&self, text: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                lines.push(String::new());
            } else {
                lines.extend(self.wrap(line));
            }
        }
        lines
    }

    /// Wrap a single paragraph of text.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let normalized = self.normalize_whitespace(text);
        let mut chunks = split_chunks(&normalized);
        chunks.reverse();

        let mut lines: Vec<String> = Vec::new();
        while !chunks.is_empty() {
            let mut cur_line: Vec<String> = Vec::new();
            let mut cur_len = 0;

            // Whitespace at the start of a continuation line is dropped
            if !lines.is_empty()
                && chunks.last().is_some_and(|chunk| chunk.trim().is_empty())
            {
                chunks.pop();
            }

            while let Some(chunk) = chunks.pop() {
                let len = display_width(&chunk);
                if cur_len + len <= self.width {
                    cur_len += len;
                    cur_line.push(chunk);
                } else {
                    chunks.push(chunk);
                    break;
                }
            }

            if chunks
                .last()
                .is_some_and(|chunk| display_width(chunk) > self.width)
            {
                self.handle_long_word(&mut chunks, &mut cur_line, cur_len);
            }

            if cur_line.last().is_some_and(|chunk| chunk.trim().is_empty())
            {
                cur_line.pop();
            }

            if !cur_line.is_empty() {
                lines.push(cur_line.concat());
            }
        }

        lines
    }

    fn handle_long_word(&self, chunks: &mut Vec<String>, cur_line: &mut Vec<String>, cur_len: usize) {
        let space_left = self.width.saturating_sub(cur_len).max(1);
        if let Some(word) = chunks.pop() {
            let (head, tail) = break_word(&word, space_left);
            cur_line.push(head.to_string());
            if !tail.is_empty() {
                chunks.push(tail.to_string());
            }
        }
    }

    fn normalize_whitespace(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut column = 0;
        for c in text.chars() {
            match c {
                '\t' => {
                    let pad = TAB_SIZE - (column % TAB_SIZE);
                    out.extend(std::iter::repeat(' ').take(pad));
                    column += pad;
                }
                '\n' | '\r' | '\x0b' | '\x0c' => {
                    out.push(' ');
                    column += 1;
                }
                _ => {
                    out.push(c);
                    column += char_width(c);
                }
            }
        }
        out
    }
}

/// Split the longest prefix of `word` that fits in `space_left` columns.
/// At least one character is always taken so wrapping makes progress.
fn break_word(word: &str, space_left: usize) -> (&str, &str) {
    let mut total = 0;
    for (i, (byte, c)) in word.char_indices().enumerate() {
        total += char_width(c);
        if total > space_left {
            let split = if i == 0 { byte + c.len_utf8() } else { byte };
            return word.split_at(split);
        }
    }
    (word, "")
}

/// Cut text into wrap chunks: whitespace runs, words, hyphenated-word heads,
/// em-dash runs and single wide glyphs.
pub fn split_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let whitespace = c.is_whitespace();
        if let Some(previous) = current {
            if previous != whitespace {
                push_run(&text[start..i], previous, &mut chunks);
                start = i;
            }
        }
        current = Some(whitespace);
    }
    if let Some(previous) = current {
        push_run(&text[start..], previous, &mut chunks);
    }

    chunks
}

fn push_run(run: &str, whitespace: bool, chunks: &mut Vec<String>) {
    if run.is_empty() {
        return;
    }
    if whitespace {
        chunks.push(run.to_string());
        return;
    }
    for piece in split_word(run) {
        chunks.extend(split_wide(piece));
    }
}

/// Break points inside a whitespace-free word.
fn split_word(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let mut cuts: Vec<usize> = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        if chars[i].1 != '-' {
            i += 1;
            continue;
        }

        let mut j = i;
        while j < chars.len() && chars[j].1 == '-' {
            j += 1;
        }

        let before = i.checked_sub(1).map(|k| chars[k].1);
        let after = chars.get(j).map(|&(_, c)| c);

        if j - i >= 2 {
            // em-dash: `word--word`
            let opens = before.is_some_and(|c| is_word_char(c) || "!\"'&.,?".contains(c));
            if opens && after.is_some_and(is_word_char) {
                cuts.push(chars[i].0);
                cuts.push(chars[j].0);
            }
        } else if hyphen_breaks(&chars, i) {
            cuts.push(chars[i].0 + 1);
        }

        i = j;
    }

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut last = 0;
    for cut in cuts {
        if cut > last && cut < word.len() {
            pieces.push(&word[last..cut]);
            last = cut;
        }
    }
    pieces.push(&word[last..]);
    pieces
}

/// A single hyphen breaks when it joins two words of at least two characters,
/// with a letter right before it and a letter somewhere after its first
/// following character.
fn hyphen_breaks(chars: &[(usize, char)], i: usize) -> bool {
    if i < 2 {
        return false;
    }
    let letter_before = chars[i - 1].1.is_alphabetic() && is_word_char(chars[i - 2].1);
    if !letter_before {
        return false;
    }

    let tail: Vec<char> = chars[i + 1..]
        .iter()
        .map(|&(_, c)| c)
        .take_while(|&c| is_word_char(c))
        .collect();
    tail.len() >= 2 && tail[1..].iter().any(|c| c.is_alphabetic())
}

/// Wide glyphs become chunks of their own; narrow runs stay together.
fn split_wide(piece: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut narrow = String::new();
    for c in piece.chars() {
        if char_width(c) >= 2 {
            if !narrow.is_empty() {
                out.push(std::mem::take(&mut narrow));
            }
            out.push(c.to_string());
        } else {
            narrow.push(c);
        }
    }
    if !narrow.is_empty() {
        out.push(narrow);
    }
    out
}

/// Helper for rendering backtick fences and inline code spans
pub struct CodeFence;

impl CodeFence {
    /// Length of a fence that cannot be closed by a backtick run inside the
    /// content. Never shorter than three.
    pub fn fence_length(content: &str) -> usize {
        longest_backtick_run(content).max(2) + 1
    }

    /// Number of backticks delimiting an inline code span.
    pub fn inline_ticks(content: &str) -> usize {
        longest_backtick_run(content) + 1
    }

    /// Opening and closing delimiters for an inline code span around
    /// `content`, padded when the content itself starts or ends with a
    /// backtick.
    pub fn inline_delimiters(content: &str) -> (String, String) {
        let ticks = "`".repeat(Self::inline_ticks(content));
        if content.starts_with('`') || content.ends_with('`') {
            (format!("{} ", ticks), format!(" {}", ticks))
        } else {
            (ticks.clone(), ticks)
        }
    }
}

fn longest_backtick_run(content: &str) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;
    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run
}

/// Helper for rendering references and cross-references
pub struct LinkRenderer;

impl LinkRenderer {
    pub fn xref(id: &str) -> String {
        format!("<xref:{}>", id)
    }

    /// Absolute URLs and site-rooted paths are links; everything else points
    /// into the generated API pages.
    pub fn is_external(uri: &str) -> bool {
        uri.starts_with('/') || url::Url::parse(uri).is_ok()
    }

    /// Derive the cross-reference id from a relative page URI such as
    /// `pkg.Mod.html#pkg.Mod.func`.
    pub fn xref_id(uri: &str) -> String {
        let mut fields = uri.splitn(2, '#');
        let page = fields.next().unwrap_or_default();
        if let Some(fragment) = fields.next() {
            if !fragment.is_empty() && !fragment.starts_with("module") {
                return fragment.to_string();
            }
        }

        let file_name = page.rsplit('/').next().unwrap_or(page);
        match file_name.find(".html") {
            Some(pos) => file_name[..pos].to_string(),
            None => page.to_string(),
        }
    }

    pub fn render_uri(text: &str, uri: &str) -> String {
        if Self::is_external(uri) {
            format!("[{}]({})", text, uri)
        } else {
            Self::xref(&Self::xref_id(uri))
        }
    }
}

/// Helper for rewriting asset paths
pub struct AssetRenderer;

impl AssetRenderer {
    /// Keep the path from the segment preceding the static-assets directory
    /// onwards, with whitespace removed. `None` when the marker is absent.
    pub fn image_path(uri: &str, marker: &str) -> Option<String> {
        let segments: Vec<&str> = uri.split('/').collect();
        let position = segments.iter().position(|segment| *segment == marker)?;
        let start = position.saturating_sub(1);
        let joined = segments[start..].join("/");
        Some(joined.split_whitespace().collect())
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
