//! Navigation seam between the client and the page location

/// Full-page navigation
pub trait Navigator {
    /// Path component of the current location
    fn current_path(&self) -> String;

    /// Leave the current page for `path`
    fn navigate(&self, path: &str);
}
