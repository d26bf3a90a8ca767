//! Query form and the per-model comparison views.

mod comparison_panel;
mod metrics_panel;
mod movie_card;
mod query_card;
mod result_list;

pub use comparison_panel::ComparisonPanel;
pub use metrics_panel::QueryMetricsPanel;
pub use movie_card::MovieCard;
pub use query_card::QueryCard;
pub use result_list::ResultList;
