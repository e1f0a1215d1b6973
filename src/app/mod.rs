use crate::config::AppConfig;
use crate::pages::{HomePage, VariantPage};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    provide_context(config);

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("") view=HomePage />
                <Route path=path!(":variant") view=VariantPage />
            </Routes>
        </Router>
    }
}
