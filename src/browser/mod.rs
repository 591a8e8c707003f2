mod launch;
mod session;

pub use launch::{build_browser_config, LaunchOptions};
pub use session::BrowserSession;
