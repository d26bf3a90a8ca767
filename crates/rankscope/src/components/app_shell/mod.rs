//! App shell components: AppBar, MetricsPane, Footer
//!
//! These components form the persistent UI framework around the dashboard.

mod appbar;
mod footer;
mod metrics_pane;

pub use appbar::AppBar;
pub use footer::Footer;
pub use metrics_pane::MetricsPane;
