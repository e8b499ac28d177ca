/// A single `Name: value` pair taken from the request header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Header names compare ASCII case-insensitively.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Headers of one request.
///
/// Entries are stored in arrival order but exposed most-recently-parsed
/// first: `iter()` walks the block bottom-up, the reverse of wire order.
/// Consumers that scan the whole list (CGI export, `get`) are therefore
/// "last write wins" over that reversed walk, which settles on the earliest
/// occurrence on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<Header>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly parsed header; it becomes the first entry `iter()` yields.
    pub fn push(&mut self, header: Header) {
        self.entries.push(header);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest-first iteration.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Header> + '_ {
        self.entries.iter().rev()
    }

    /// Value a full newest-first scan ends up with for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .filter(|h| h.is(name))
            .last()
            .map(|h| h.value.as_str())
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a Header;
    type IntoIter = std::iter::Rev<std::slice::Iter<'a, Header>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().rev()
    }
}
