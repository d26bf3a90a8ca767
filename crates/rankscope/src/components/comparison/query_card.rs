use dioxus::prelude::*;

use crate::components::{use_controller, use_dashboard};

/// Query form: user id, K and the submit button
#[component]
pub fn QueryCard() -> Element {
    let controller = use_controller();
    let state = use_dashboard().signal();

    let (user_id, k, can_submit, loading) = {
        let state = state.read();
        (
            state.user_id_input().to_string(),
            state.k_input().to_string(),
            state.can_submit(),
            state.is_loading(),
        )
    };

    let submit = use_callback({
        let controller = controller.clone();
        move |()| {
            let controller = controller.clone();
            spawn(async move {
                controller.submit().await;
            });
        }
    });

    let handle_keypress = move |evt: KeyboardEvent| {
        if evt.key() == Key::Enter {
            submit.call(());
        }
    };

    let on_user_input = {
        let controller = controller.clone();
        move |evt: FormEvent| controller.set_user_id(evt.value())
    };
    let on_k_input = move |evt: FormEvent| controller.set_k(evt.value());

    rsx! {
        section { class: "rs-card rs-query-card",
            h2 { class: "rs-card-title", "Get Recommendations" }
            div { class: "rs-query-row",
                label { class: "rs-field",
                    span { class: "rs-field-label", "User ID" }
                    input {
                        class: "rs-input",
                        r#type: "text",
                        placeholder: "e.g. 1",
                        value: "{user_id}",
                        oninput: on_user_input,
                        onkeypress: handle_keypress,
                    }
                }
                label { class: "rs-field rs-field--narrow",
                    span { class: "rs-field-label", "K" }
                    input {
                        class: "rs-input",
                        r#type: "number",
                        min: "1",
                        value: "{k}",
                        oninput: on_k_input,
                        onkeypress: handle_keypress,
                    }
                }
                button {
                    class: "rs-btn rs-btn--primary",
                    disabled: !can_submit,
                    onclick: move |_| submit.call(()),
                    if loading {
                        "Loading..."
                    } else {
                        "Get Recommendations"
                    }
                }
            }
        }
    }
}
