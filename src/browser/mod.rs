pub mod driver;
pub mod screenshot;
pub mod session;
pub mod webdriver;
