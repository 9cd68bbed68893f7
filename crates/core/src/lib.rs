//! Courier core: session, guard, theme and date handling for the chat web client

pub mod config;
pub mod datetime;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod page;
pub mod session;
pub mod theme;

#[cfg(any(test, feature = "tests"))]
pub mod testing;

pub use config::{AuthConfig, ClientConfig, ClientProfile};
pub use datetime::{DateFormat, format_date, format_date_at};
pub use error::{CoreError, CoreResult};
pub use guard::{AuthDecision, check_auth};
pub use navigation::Navigator;
pub use page::{PageControls, PagePlan};
pub use session::{SessionContext, SessionStore};
pub use theme::{Theme, ThemeSurface, restore_theme, toggle_theme};
