use dioxus::prelude::*;

use crate::components::use_services;

/// Footer naming the services the dashboard talks to
#[component]
pub fn Footer() -> Element {
    let services = use_services();
    let backend = services.config.backend_url.clone();
    let language = services.config.catalog_language.clone();

    rsx! {
        footer { class: "rs-footer",
            span { class: "rs-footer-text",
                "Backend {backend} • Catalog locale {language}"
            }
        }
    }
}
