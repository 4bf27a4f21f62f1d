//! Prefix queries over tokenized destination names.
//!
//! Names and queries are split on anything that is not alphanumeric,
//! lowercased and stripped of Latin diacritics, so "Cafe" finds "Café" the
//! same way the FTS5 `unicode61` tokenizer does. A name matches when every query token except the last equals
//! one of its tokens and the last query token prefixes one of its tokens.
//! This mirrors an FTS5 query whose final term carries a `*` wildcard.
//!
//! # Examples
//! ```
//! use wayfare_core::PrefixQuery;
//!
//! let query = PrefixQuery::parse("new yo");
//! assert!(query.matches("New York"));
//! assert!(!query.matches("Newark"));
//! assert!(PrefixQuery::parse(" -- ").is_empty());
//! ```

use unicode_normalization::UnicodeNormalization;

/// Split `text` into lowercase alphanumeric tokens with diacritics removed.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> {
    let folded = fold_diacritics(text);
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .into_iter()
}

/// Decompose and drop the Combining Diacritical Marks block.
fn fold_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !matches!(c, '\u{0300}'..='\u{036F}'))
        .collect()
}

/// A parsed free-text query whose last token is a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefixQuery {
    tokens: Vec<String>,
}

impl PrefixQuery {
    /// Parse free text into query tokens.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            tokens: tokenize(text).collect(),
        }
    }

    /// Whether the query has no usable tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Query tokens in input order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether `name` satisfies the query. An empty query matches nothing.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let Some((prefix, exact)) = self.tokens.split_last() else {
            return false;
        };
        let name_tokens: Vec<String> = tokenize(name).collect();
        exact.iter().all(|token| name_tokens.contains(token))
            && name_tokens.iter().any(|token| token.starts_with(prefix.as_str()))
    }

    /// Render the query as an FTS5 `MATCH` expression.
    ///
    /// Each token is double-quoted so punctuation never reaches the FTS5
    /// parser; the last token gets the prefix operator. Returns `None` for an
    /// empty query.
    ///
    /// ```
    /// use wayfare_core::PrefixQuery;
    ///
    /// assert_eq!(
    ///     PrefixQuery::parse("Saint-Ger").to_fts5().as_deref(),
    ///     Some("\"saint\" \"ger\"*"),
    /// );
    /// ```
    #[must_use]
    pub fn to_fts5(&self) -> Option<String> {
        let (last, rest) = self.tokens.split_last()?;
        let mut terms: Vec<String> = rest.iter().map(|token| quote(token)).collect();
        terms.push(format!("{}*", quote(last)));
        Some(terms.join(" "))
    }
}

fn quote(token: &str) -> String {
    format!("\"{}\"", token.replace('"', "\"\""))
}

impl From<&str> for PrefixQuery {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
