//! Page-wide client instance

use crate::navigation::BrowserNavigator;
use crate::storage::BrowserStore;
use courier_core::{ClientConfig, DateFormat, SessionContext};
use courier_http::{AuthenticatedClient, ClientError};
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    /// Client installed by `start`, used by the JS exports
    static CLIENT: RefCell<Option<AuthenticatedClient>> = const { RefCell::new(None) };

    static DATE_FORMAT: RefCell<DateFormat> = RefCell::new(DateFormat::default());
}

/// Build a client over the browser's storage and location
pub fn create_client(config: &ClientConfig) -> Result<AuthenticatedClient, ClientError> {
    let session = SessionContext::new(Rc::new(BrowserStore::new()), config.profile);
    AuthenticatedClient::from_config(config, session, Rc::new(BrowserNavigator))
}

/// Make `client` and the configured date format the page-wide defaults
pub fn install(client: AuthenticatedClient, config: &ClientConfig) {
    CLIENT.with(|slot| *slot.borrow_mut() = Some(client));
    DATE_FORMAT.with(|format| *format.borrow_mut() = config.date_format.clone());
}

/// The installed client, if `start` has run
pub fn installed_client() -> Option<AuthenticatedClient> {
    CLIENT.with(|slot| slot.borrow().clone())
}

pub fn date_format() -> DateFormat {
    DATE_FORMAT.with(|format| format.borrow().clone())
}
