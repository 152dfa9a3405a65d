use serde::Serialize;

/// Query parameters for `GET /api/students`, sent in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequestFilters(Vec<(String, String)>);

impl RequestFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    pub fn section(self, section: impl Into<String>) -> Self {
        self.with("section", section)
    }

    pub fn department(self, department: impl Into<String>) -> Self {
        self.with("department", department)
    }

    pub fn duration(self, duration: impl Into<String>) -> Self {
        self.with("duration", duration)
    }

    pub fn has_nfc(self, has_nfc: bool) -> Self {
        self.with("has_nfc", has_nfc.to_string())
    }

    /// Free-text search, the backend ignores the other filters when present
    pub fn search(self, search: impl Into<String>) -> Self {
        self.with("search", search)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<K, V> FromIterator<(K, V)> for RequestFilters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
