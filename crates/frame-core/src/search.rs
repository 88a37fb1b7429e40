//! Text search and the incremental search overlay.
//!
//! The free functions search a UTF-8 `&str` using **byte offsets** for all inputs and outputs.
//! Plain queries are escaped and compiled into a regex, so plain and regex search share one
//! path. Optional case folding and whole-word filtering are available.
//!
//! The overlay half lives on [`Registry`]: a search frame's buffer holds the query, and every
//! edit of that buffer re-runs [`Registry::update_search`] against the parent frame's buffer.

use crate::error::{RegistryError, SearchError};
use crate::frame::SearchStatus;
use crate::registry::{FrameId, Registry};
use crate::state::{ChangeEvent, ChangeKind};
use crate::text::ceil_char_boundary;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Case-sensitive matching.
    pub case_sensitive: bool,
    /// Only match whole words (alphanumeric and `_`).
    pub whole_word: bool,
    /// Treat the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

/// Half-open byte range of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl SearchMatch {
    /// Length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

fn compile(query: &str, options: SearchOptions) -> Result<Regex, SearchError> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    Ok(RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()?)
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, m: SearchMatch) -> bool {
    let before = text[..m.start].chars().next_back();
    let after = text[m.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// First occurrence of `query` in `text` starting at or after byte offset `from`.
///
/// An empty query never matches. `from` is clamped and rounded up to a char boundary.
pub fn find_next(
    text: &str,
    query: &str,
    options: SearchOptions,
    from: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }
    let re = compile(query, options)?;

    let mut start = ceil_char_boundary(text, from);
    loop {
        let Some(m) = re.find_at(text, start) else {
            return Ok(None);
        };
        let candidate = SearchMatch {
            start: m.start(),
            end: m.end(),
        };
        if candidate.is_empty() {
            if candidate.end >= text.len() {
                return Ok(None);
            }
            start = ceil_char_boundary(text, candidate.end + 1);
            continue;
        }
        if options.whole_word && !is_whole_word(text, candidate) {
            start = candidate.end;
            continue;
        }
        return Ok(Some(candidate));
    }
}

/// Every non-overlapping occurrence of `query` in `text`.
pub fn find_all(
    text: &str,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let re = compile(query, options)?;
    Ok(re
        .find_iter(text)
        .map(|m| SearchMatch {
            start: m.start(),
            end: m.end(),
        })
        .filter(|m| !m.is_empty())
        .filter(|m| !options.whole_word || is_whole_word(text, *m))
        .collect())
}

impl Registry {
    /// Re-scan the parent's buffer for the search frame's query, starting at the search origin.
    ///
    /// On a hit the parent frame is scrolled so the match line sits mid-frame. An empty query,
    /// a miss, or an invalid pattern all leave the status at [`SearchStatus::NotFound`].
    pub fn update_search(&mut self, search: FrameId) -> Result<SearchStatus, RegistryError> {
        let frame = self.frame(search)?;
        let state = frame
            .search()
            .ok_or(RegistryError::NotTransient(search))?;
        let parent = frame
            .parent()
            .ok_or(RegistryError::NotTransient(search))?;
        let (origin, options) = (state.origin, state.options);
        let query = self.buffer(frame.buffer())?.as_str();
        let haystack = self.buffer_of(parent)?;

        let found = match find_next(haystack.as_str(), query, options, origin) {
            Ok(found) => found,
            Err(err) => {
                warn!(target: "search", %err, "search_pattern_invalid");
                None
            }
        };
        let match_line = found.map(|m| haystack.line_of_offset(m.start));
        debug!(target: "search", frame = search.index(), origin, found = ?found, "search_update");

        let status = if found.is_some() {
            SearchStatus::Found
        } else {
            SearchStatus::NotFound
        };
        if let Some(state) = self.frame_mut(search)?.search_mut() {
            state.status = status;
            state.current = found;
            if found.is_some() {
                state.last_found = found;
            }
        }
        if let Some(line) = match_line {
            self.center_on_line(parent, line)?;
        }
        self.emit(ChangeEvent::frame(ChangeKind::SearchUpdated, search));
        Ok(status)
    }

    /// Move the search origin just past the current match and search again.
    ///
    /// No-op (returning the current status) when nothing is found.
    pub fn advance_search(&mut self, search: FrameId) -> Result<SearchStatus, RegistryError> {
        let state = self
            .frame_mut(search)?
            .search_mut()
            .ok_or(RegistryError::NotTransient(search))?;
        match (state.status, state.current) {
            (SearchStatus::Found, Some(current)) => {
                state.origin = current.end;
                self.update_search(search)
            }
            (status, _) => Ok(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_query_is_escaped() {
        let text = "a.b axb";
        let found = find_next(text, "a.b", SearchOptions::default(), 1).unwrap();
        assert_eq!(found, None);
        let found = find_next(text, "a.b", SearchOptions::default(), 0).unwrap();
        assert_eq!(found, Some(SearchMatch { start: 0, end: 3 }));
    }

    #[test]
    fn offsets_are_bytes() {
        let text = "héllo héllo";
        let found = find_next(text, "llo", SearchOptions::default(), 4).unwrap();
        assert_eq!(found, Some(SearchMatch { start: 10, end: 13 }));
    }

    #[test]
    fn case_and_whole_word_options() {
        let text = "Foo food foo";
        let options = SearchOptions {
            case_sensitive: false,
            whole_word: true,
            regex: false,
        };
        let all = find_all(text, "foo", options).unwrap();
        assert_eq!(
            all,
            vec![
                SearchMatch { start: 0, end: 3 },
                SearchMatch { start: 9, end: 12 }
            ]
        );
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let options = SearchOptions {
            regex: true,
            ..SearchOptions::default()
        };
        assert!(matches!(
            find_next("abc", "(", options, 0),
            Err(SearchError::InvalidRegex(_))
        ));
    }

    #[test]
    fn empty_query_never_matches() {
        assert_eq!(find_next("abc", "", SearchOptions::default(), 0).unwrap(), None);
        assert!(find_all("abc", "", SearchOptions::default()).unwrap().is_empty());
    }
}
