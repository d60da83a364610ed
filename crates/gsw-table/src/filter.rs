//! Location allow-list.

/// Keeps a location iff its name contains at least one allow-listed fragment.
///
/// Black-market and numeric-only satellite markets are dropped simply by not
/// being listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFilter {
    allowed: Vec<String>,
}

impl LocationFilter {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_allowed(&self, location: &str) -> bool {
        self.allowed
            .iter()
            .any(|fragment| location.contains(fragment.as_str()))
    }
}
