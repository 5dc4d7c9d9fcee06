pub mod chrome;
pub mod expect;
pub mod session;

pub use chrome::ChromeDriver;
pub use expect::{expect, expect_page, LocatorAssertions, PageAssertions};
pub use session::{Locator, Session};
