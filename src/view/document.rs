/// The host page, addressed by element id
pub trait Document: Send + Sync + std::fmt::Debug {
    /// Replace the element's markup, `false` when no such element exists
    fn set_inner_html(&self, element_id: &str, html: &str) -> bool;
}
