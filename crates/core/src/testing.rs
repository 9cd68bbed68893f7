//! In-memory doubles for the browser seams

use crate::navigation::Navigator;
use crate::session::SessionStore;
use crate::theme::ThemeSurface;
use std::cell::RefCell;
use std::collections::HashMap;

/// `SessionStore` backed by a map and an optional cookie string
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    cookie: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_cookie(self, cookie: &str) -> Self {
        self.set_cookie(Some(cookie));
        self
    }

    pub fn set_cookie(&self, cookie: Option<&str>) {
        *self.cookie.borrow_mut() = cookie.map(str::to_string);
    }

    /// Locally stored token, bypassing the cookie
    pub fn stored_token(&self) -> Option<String> {
        self.items.borrow().get("token").cloned()
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }

    fn cookie_string(&self) -> Option<String> {
        self.cookie.borrow().clone()
    }
}

/// `Navigator` that records every navigation instead of leaving the page
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    path: RefCell<String>,
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            path: RefCell::new(path.to_string()),
            visits: RefCell::default(),
        }
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    pub fn last_visit(&self) -> Option<String> {
        self.visits.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn navigate(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_string());
        *self.path.borrow_mut() = path.to_string();
    }
}

/// `ThemeSurface` holding the attribute and the icon's class list as strings
#[derive(Debug, Default)]
pub struct MemorySurface {
    attribute: RefCell<Option<String>>,
    icon: RefCell<Option<Vec<String>>>,
}

impl MemorySurface {
    pub fn new(attribute: Option<&str>, icon_classes: Option<&str>) -> Self {
        Self {
            attribute: RefCell::new(attribute.map(str::to_string)),
            icon: RefCell::new(
                icon_classes.map(|classes| classes.split_whitespace().map(str::to_string).collect()),
            ),
        }
    }

    pub fn attribute(&self) -> Option<String> {
        self.attribute.borrow().clone()
    }

    pub fn icon_classes(&self) -> Option<String> {
        self.icon.borrow().as_ref().map(|classes| classes.join(" "))
    }
}

impl ThemeSurface for MemorySurface {
    fn theme_attribute(&self) -> Option<String> {
        self.attribute()
    }

    fn set_theme_attribute(&self, value: &str) {
        *self.attribute.borrow_mut() = Some(value.to_string());
    }

    fn replace_icon_class(&self, from: &str, to: &str) -> bool {
        let mut icon = self.icon.borrow_mut();
        let Some(classes) = icon.as_mut() else {
            return false;
        };
        if let Some(class) = classes.iter_mut().find(|class| *class == from) {
            *class = to.to_string();
        }
        true
    }
}
