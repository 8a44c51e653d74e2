use tracing::{debug, trace};

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: char = '=';

/// A decoded `name=value` token. Borrows from the raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionPair<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Splits `token` at the first `separator`. The value keeps any later
/// separators; nothing is trimmed.
pub fn split_option(token: &str, separator: char) -> Option<OptionPair<'_>> {
    token
        .split_once(separator)
        .map(|(name, value)| OptionPair { name, value })
}

/// Outcome of dispatching a list of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    delivered: usize,
    skipped: Vec<String>,
}

impl DispatchReport {
    /// Number of pairs handed to the handler.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Tokens dropped because they had no separator, in input order.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Feeds decoded option pairs to a handler, one at a time and in order.
///
/// The handler has the shape `FnMut(&str, &str) -> Result<(), E>`. The first
/// error it returns stops dispatch and is passed back to the caller; tokens
/// after it are never delivered.
#[derive(Debug, Clone)]
pub struct Dispatcher<H> {
    handler: H,
    separator: char,
}

impl<H> Dispatcher<H> {
    pub fn new(handler: H) -> Self {
        Dispatcher {
            handler,
            separator: DEFAULT_SEPARATOR,
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Delivers a single token. Returns `Ok(false)` if the token had no
    /// separator and was dropped.
    pub fn dispatch_one<E>(&mut self, token: &str) -> Result<bool, E>
    where
        H: FnMut(&str, &str) -> Result<(), E>,
    {
        match split_option(token, self.separator) {
            Some(pair) => {
                trace!(name = pair.name, value = pair.value, "dispatching option");
                (self.handler)(pair.name, pair.value)?;
                Ok(true)
            }
            None => {
                debug!(token, separator = %self.separator, "dropping option without separator");
                Ok(false)
            }
        }
    }

    /// Delivers every token in order.
    pub fn dispatch<I, E>(&mut self, tokens: I) -> Result<DispatchReport, E>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        H: FnMut(&str, &str) -> Result<(), E>,
    {
        let mut report = DispatchReport::default();
        for token in tokens {
            let token = token.as_ref();
            if self.dispatch_one(token)? {
                report.delivered += 1;
            } else {
                report.skipped.push(token.to_string());
            }
        }
        Ok(report)
    }
}

/// Dispatches all `tokens` to `handler` with the default separator.
///
/// ```
/// let mut seen = Vec::new();
/// let report = optf::dispatch(["a=1", "junk", "b=x=y"], |name: &str, value: &str| {
///     seen.push(format!("{name}:{value}"));
///     Ok::<_, optf::ConversionError>(())
/// })
/// .unwrap();
/// assert_eq!(seen, ["a:1", "b:x=y"]);
/// assert_eq!(report.skipped(), ["junk"]);
/// ```
pub fn dispatch<I, H, E>(tokens: I, handler: H) -> Result<DispatchReport, E>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    H: FnMut(&str, &str) -> Result<(), E>,
{
    Dispatcher::new(handler).dispatch(tokens)
}
