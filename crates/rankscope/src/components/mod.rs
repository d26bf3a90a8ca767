//! UI components for the Rankscope dashboard.
//!
//! - `app_shell`: AppBar, MetricsPane, Footer
//! - `offline_chart`: offline metrics bar chart
//! - `comparison`: QueryCard, ComparisonPanel, ResultList, MovieCard,
//!   QueryMetricsPanel
//!
//! # Context Providers
//!
//! [`Dashboard`] provides three contexts to everything below it:
//!
//! ```ignore
//! // Services built from the configuration (backend + catalog clients)
//! let services = use_services();
//!
//! // Dashboard state; read the signal to subscribe
//! let state = use_dashboard().signal();
//! if state.read().is_loading() { /* ... */ }
//!
//! // Controller driving the state (queries, tabs, form inputs)
//! let controller = use_controller();
//! controller.select_tab(ModelFamily::Bpr);
//! ```

mod app_shell;
mod comparison;
mod offline_chart;

pub use app_shell::{AppBar, Footer, MetricsPane};
pub use comparison::{ComparisonPanel, MovieCard, QueryCard, QueryMetricsPanel, ResultList};
pub use offline_chart::OfflineMetricsChart;

use dioxus::logger::tracing::{error, info, warn};
use dioxus::prelude::*;
use std::rc::Rc;

use rankscope_core::api::CatalogApi;
use rankscope_core::client::{HttpCatalogClient, HttpRecommenderClient};
use rankscope_core::config::DashboardConfig;
use rankscope_core::dashboard::{DashboardController, DashboardState};
use rankscope_core::enrichment::MemoizingCatalog;
use rankscope_core::error::ApiError;

use crate::utils::DashboardSignal;

/// Controller type used throughout the component tree.
pub type AppController = DashboardController<Rc<HttpRecommenderClient>, DashboardSignal>;

/// Clients and configuration shared by all components.
#[derive(Clone)]
pub struct AppServices {
    pub config: Rc<DashboardConfig>,
    pub backend: Rc<HttpRecommenderClient>,
    pub catalog: Rc<dyn CatalogApi>,
}

impl PartialEq for AppServices {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config)
            && Rc::ptr_eq(&self.backend, &other.backend)
            && Rc::ptr_eq(&self.catalog, &other.catalog)
    }
}

impl AppServices {
    pub fn from_config(config: DashboardConfig) -> Result<Self, ApiError> {
        let backend = HttpRecommenderClient::from_config(&config)?;
        let catalog_client = HttpCatalogClient::from_config(&config)?;

        if config.catalog_api_key.is_none() {
            warn!("No catalog API key configured; movie cards will show placeholders");
        }

        let catalog: Rc<dyn CatalogApi> = if config.share_enrichment_cache {
            info!("Movie cards share one catalog cache");
            Rc::new(MemoizingCatalog::new(catalog_client))
        } else {
            Rc::new(catalog_client)
        };

        Ok(Self {
            config: Rc::new(config),
            backend: Rc::new(backend),
            catalog,
        })
    }
}

/// Environment configuration, falling back to defaults when it is invalid.
fn load_config() -> DashboardConfig {
    match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring invalid configuration: {}", e);
            DashboardConfig::default()
        }
    }
}

pub fn use_services() -> AppServices {
    use_context::<AppServices>()
}

pub fn use_dashboard() -> DashboardSignal {
    use_context::<DashboardSignal>()
}

pub fn use_controller() -> AppController {
    use_context::<AppController>()
}

#[component]
pub fn App() -> Element {
    let services = use_hook(|| {
        AppServices::from_config(load_config()).map_err(|e| {
            error!("Failed to create service clients: {}", e);
            e.to_string()
        })
    });

    match services {
        Ok(services) => rsx! {
            Dashboard { services }
        },
        Err(message) => rsx! {
            StartupError { message }
        },
    }
}

/// Dashboard root: owns the state signal and the controller.
#[component]
pub fn Dashboard(services: AppServices) -> Element {
    let state = use_signal(|| DashboardState::new(&services.config));
    let dashboard = use_context_provider(|| DashboardSignal::new(state));
    let controller =
        use_context_provider(|| DashboardController::new(services.backend.clone(), dashboard));
    use_context_provider(|| services.clone());

    // Offline metrics are fetched once per mount, never retried
    use_hook(|| {
        let controller = controller.clone();
        spawn(async move {
            controller.load_offline_metrics().await;
        })
    });

    let mut metrics_collapsed = use_signal(|| true);

    rsx! {
        div { class: "rs-app",
            AppBar {
                metrics_collapsed,
                on_metrics_toggle: move |_| {
                    metrics_collapsed.set(!metrics_collapsed());
                },
            }

            MetricsPane { collapsed: metrics_collapsed }

            main { class: "rs-main",
                OfflineMetricsChart {}
                QueryCard {}
                ComparisonPanel {}
            }

            Footer {}
        }
    }
}

/// Shown instead of the dashboard when the clients cannot be built.
#[component]
fn StartupError(message: String) -> Element {
    rsx! {
        section { class: "rs-empty-state",
            div { class: "rs-empty-card",
                h2 { class: "rs-empty-title", "Rankscope could not start" }
                p { class: "rs-empty-text", "{message}" }
                p { class: "rs-empty-text",
                    "Check RANKSCOPE_BACKEND_URL and RANKSCOPE_CATALOG_URL."
                }
            }
        }
    }
}
