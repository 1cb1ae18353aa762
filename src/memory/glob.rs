//! Glob Matching
//!
//! Key-pattern matching used by the in-memory scan. Supports:
//! - `*` any run of characters, including none
//! - `?` exactly one character
//! - `[abc]`, `[a-z]` one character from a set or range
//! - `[^abc]` / `[!abc]` one character outside a set
//! - `\x` the literal character `x`
//!
//! Single pass with backtracking to the most recent `*`.

pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();

    let mut p = 0;
    let mut t = 0;
    // (pattern index after the last '*', text index it is currently absorbing up to)
    let mut star: Option<(usize, usize)> = None;

    while t < txt.len() {
        if p < pat.len() && pat[p] == '*' {
            star = Some((p + 1, t));
            p += 1;
            continue;
        }

        if p < pat.len() {
            if let Some(next) = match_token(&pat, p, txt[t]) {
                p = next;
                t += 1;
                continue;
            }
        }

        match star {
            Some((star_p, star_t)) => {
                star = Some((star_p, star_t + 1));
                p = star_p;
                t = star_t + 1;
            }
            None => return false,
        }
    }

    pat[p..].iter().all(|&c| c == '*')
}

/// Matches the single non-star token at `pat[p]` against `ch`, returning
/// the index of the next token on success.
fn match_token(pat: &[char], p: usize, ch: char) -> Option<usize> {
    match pat[p] {
        '?' => Some(p + 1),
        '\\' if p + 1 < pat.len() => (pat[p + 1] == ch).then_some(p + 2),
        '[' => match match_class(pat, p, ch) {
            Some((true, end)) => Some(end),
            Some((false, _)) => None,
            // unterminated class, '[' is literal
            None => (ch == '[').then_some(p + 1),
        },
        c => (c == ch).then_some(p + 1),
    }
}

/// Evaluates the class opening at `pat[start]`. Returns whether `ch` is
/// accepted and the index just past the closing `]`, or `None` if the
/// class never closes.
fn match_class(pat: &[char], start: usize, ch: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negated = i < pat.len() && (pat[i] == '^' || pat[i] == '!');
    if negated {
        i += 1;
    }

    let mut matched = false;
    while i < pat.len() {
        match pat[i] {
            ']' => return Some((matched != negated, i + 1)),
            '\\' if i + 1 < pat.len() => {
                matched |= pat[i + 1] == ch;
                i += 2;
            }
            lo if i + 2 < pat.len() && pat[i + 1] == '-' && pat[i + 2] != ']' => {
                let hi = pat[i + 2];
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                matched |= lo <= ch && ch <= hi;
                i += 3;
            }
            c => {
                matched |= c == ch;
                i += 1;
            }
        }
    }

    None
}
