use leptos::{ev::SubmitEvent, leptos_dom::helpers::set_timeout, prelude::*};
use storefront::prelude::*;
use web_sys::wasm_bindgen::JsCast;

use crate::{announce, storage::CartHandle};

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        _ = window.alert_with_message(message);
    }
}

fn focus_field(field: ContactField) {
    let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(field.input_id()))
    else {
        return;
    };

    if let Ok(input) = element.dyn_into::<web_sys::HtmlElement>() {
        _ = input.focus();
    }
}

/// Open the checkout modal, or warn that the cart is empty.
pub fn open_checkout(cart: CartHandle, checkout: RwSignal<Checkout>) {
    let opened = checkout.try_update(|flow| cart.with_untracked(|snapshot| flow.open(snapshot)));

    if let Some(Err(error)) = opened {
        alert(&error.to_string());
    }
}

/// Contact details modal.
///
/// After a successful submission the form stays disabled and the modal closes itself after
/// [`AUTO_CLOSE_DELAY`]; clicking the backdrop closes it at any time.
#[component]
pub fn CheckoutModal(
    cart: CartHandle,
    checkout: RwSignal<Checkout>,
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let phone = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let message = RwSignal::new(None::<String>);
    let generation = RwSignal::new(0_u64);

    let reset = move || {
        generation.update(|generation| *generation = generation.saturating_add(1));
        phone.set(String::new());
        email.set(String::new());
        message.set(None);
    };

    let close = move || {
        checkout.update(|flow| {
            flow.close();
        });
        reset();
    };

    let close_on_backdrop = move || {
        checkout.update(|flow| {
            flow.backdrop_click();
        });
        reset();
    };

    let schedule_auto_close = move || {
        let run_id = generation.get_untracked();

        set_timeout(
            move || {
                if generation.get_untracked() == run_id {
                    close();
                }
            },
            AUTO_CLOSE_DELAY,
        );
    };

    let submit = move |event: SubmitEvent| {
        event.prevent_default();

        let form = ContactForm {
            phone: phone.get_untracked(),
            email: Some(email.get_untracked()),
        };

        let outcome = cart.update(|store| {
            checkout.try_update(|flow| flow.submit(&form, store).map(Confirmation::message))
        });

        match outcome {
            Some(Ok(confirmation)) => {
                message.set(Some(confirmation.clone()));
                announce(live_message, confirmation);
                schedule_auto_close();
            }
            Some(Err(CheckoutError::Validation(error))) => {
                message.set(Some(error.message()));
                focus_field(error.field);
            }
            Some(Err(error)) => message.set(Some(error.to_string())),
            None => {}
        }
    };

    let locked = move || !checkout.with(Checkout::can_submit);

    view! {
        <Show when=move || checkout.with(Checkout::is_open)>
            <div class="modal" role="presentation" on:click=move |_| close_on_backdrop()>
                <div
                    class="modal-content"
                    role="dialog"
                    aria-modal="true"
                    aria-labelledby="checkout-title"
                    on:click=|event| event.stop_propagation()
                >
                    <button
                        type="button"
                        class="close-button"
                        aria-label="Cerrar"
                        on:click=move |_| close()
                    >
                        "×"
                    </button>
                    <h2 id="checkout-title">"Datos de contacto"</h2>
                    <form class="contact-form" on:submit=submit>
                        <label for="user-phone">"Teléfono"</label>
                        <input
                            id="user-phone"
                            type="tel"
                            prop:value=move || phone.get()
                            on:input=move |event| phone.set(event_target_value(&event))
                            disabled=locked
                        />
                        <label for="user-email">"Correo electrónico (opcional)"</label>
                        <input
                            id="user-email"
                            type="email"
                            prop:value=move || email.get()
                            on:input=move |event| email.set(event_target_value(&event))
                            disabled=locked
                        />
                        <button type="submit" class="submit-button" disabled=locked>
                            "Enviar"
                        </button>
                    </form>
                    <p class="submission-message" role="status">
                        {move || message.get()}
                    </p>
                </div>
            </div>
        </Show>
    }
}
