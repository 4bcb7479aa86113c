//! Free-text query normalization.
//!
//! Splits a raw query string into search terms. A double-quoted phrase is kept
//! together as one term; everything else is split on whitespace.

/// Split a query string into individual search terms.
///
/// Unnecessary whitespace is removed and quoted words are grouped together.
/// At every position a quoted phrase (`"` + one or more non-quote characters +
/// `"`) is tried first; otherwise the maximal run of non-whitespace characters
/// becomes the term. An unterminated quote is therefore not a phrase: the
/// quote character stays glued to the token it starts.
///
/// # Examples
///
/// ```
/// use listing_search::query::normalize_query;
///
/// assert_eq!(
///     normalize_query(r#"  some random  words "with   quotes  " and   spaces"#),
///     vec!["some", "random", "words", "with quotes", "and", "spaces"]
/// );
/// assert!(normalize_query("   ").is_empty());
/// ```
pub fn normalize_query(query: &str) -> Vec<String> {
    find_terms(query)
        .into_iter()
        .map(|raw| collapse_whitespace(raw.trim_matches(is_space)))
        // A phrase made only of whitespace would otherwise yield an empty
        // term, which matches every record.
        .filter(|term| !term.is_empty())
        .collect()
}

/// Scan `query` and return the raw (not yet cleaned) term slices.
fn find_terms(query: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut rest = query;

    while let Some(ch) = rest.chars().next() {
        if let Some((phrase, consumed)) = match_quoted(rest) {
            terms.push(phrase);
            rest = &rest[consumed..];
        } else if is_space(ch) {
            rest = &rest[ch.len_utf8()..];
        } else {
            let len = rest.find(is_space).unwrap_or(rest.len());
            terms.push(&rest[..len]);
            rest = &rest[len..];
        }
    }

    terms
}

/// Whitespace as used for splitting and trimming terms.
///
/// Unicode whitespace plus the information separators U+001C..=U+001F, which
/// `char::is_whitespace` leaves out.
fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

/// Match `"phrase"` at the start of `input`.
///
/// Returns the interior and the number of bytes consumed including both quotes.
/// `""` is not a phrase.
fn match_quoted(input: &str) -> Option<(&str, usize)> {
    let inner = input.strip_prefix('"')?;
    let close = inner.find('"')?;
    if close == 0 {
        return None;
    }
    Some((&inner[..close], close + 2))
}

/// Replace every run of two or more whitespace characters with one space.
///
/// A single whitespace character is left untouched, even if it is not a space.
fn collapse_whitespace(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut run_start = None;
    let mut run_len = 0usize;

    for ch in term.chars() {
        if is_space(ch) {
            if run_len == 0 {
                run_start = Some(ch);
            }
            run_len += 1;
            continue;
        }
        flush_run(&mut out, run_start.take(), run_len);
        run_len = 0;
        out.push(ch);
    }
    flush_run(&mut out, run_start, run_len);

    out
}

fn flush_run(out: &mut String, first: Option<char>, len: usize) {
    match (first, len) {
        (Some(ch), 1) => out.push(ch),
        (Some(_), _) => out.push(' '),
        (None, _) => {}
    }
}
