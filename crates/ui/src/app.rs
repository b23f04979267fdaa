use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;
use crate::views::use_auth_ui_provider;

#[component]
pub fn App() -> Element {
    use_auth_ui_provider();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Stable OS/window title. Per-route headings are rendered inside the page.
        document::Title { "Skillshare" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
