//! Leptos Storefront Demo Application

use leptos::prelude::*;
use storefront::prelude::*;

use crate::storage::CartHandle;

mod admin;
mod cart;
mod catalog;
mod checkout;
mod observability;
mod storage;

/// Top-level screens reachable from the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Page {
    #[default]
    Catalog,
    Cart,
    Admin,
}

impl Page {
    const ALL: [Self; 3] = [Self::Catalog, Self::Cart, Self::Admin];

    fn label(self) -> &'static str {
        match self {
            Self::Catalog => "Productos",
            Self::Cart => "Carrito",
            Self::Admin => "Administrar",
        }
    }
}

#[component]
fn NavButton(page: Page, current: RwSignal<Page>, cart: CartHandle) -> impl IntoView {
    let counter = (page == Page::Cart).then(|| {
        view! {
            <span class="cart-counter" aria-label="Productos en el carrito">
                {move || cart.with(Cart::total_item_count)}
            </span>
        }
    });

    view! {
        <button
            type="button"
            class="nav-button"
            aria-current=move || (current.get() == page).then_some("page")
            on:click=move |_| current.set(page)
        >
            {page.label()}
            {counter}
        </button>
    }
}

/// Main demo app shell.
#[component]
fn App() -> impl IntoView {
    let current = RwSignal::new(Page::default());
    let cart = CartHandle::open();
    let checkout = RwSignal::new(Checkout::new());
    let live_message = RwSignal::new((0_u64, String::new()));

    view! {
        <main class="storefront">
            <p class="sr-only" role="status" aria-live="polite" aria-atomic="true">
                {move || live_message.get().1}
            </p>
            <header class="site-header">
                <h1 class="site-title">"Tienda Mágica"</h1>
                <nav class="site-nav">
                    {Page::ALL
                        .into_iter()
                        .map(|page| view! { <NavButton page=page current=current cart=cart /> })
                        .collect_view()}
                </nav>
            </header>
            {move || match current.get() {
                Page::Catalog => {
                    view! { <catalog::CatalogPage cart=cart live_message=live_message /> }
                        .into_any()
                }
                Page::Cart => {
                    view! {
                        <cart::CartPage cart=cart checkout=checkout live_message=live_message />
                    }
                        .into_any()
                }
                Page::Admin => view! { <admin::AdminPage /> }.into_any(),
            }}
            <checkout::CheckoutModal cart=cart checkout=checkout live_message=live_message />
        </main>
    }
}

/// Mount the storefront on the page body.
fn main() {
    console_error_panic_hook::set_once();
    observability::init_subscriber();

    leptos::mount::mount_to_body(App);
}

fn announce(live_message: RwSignal<(u64, String)>, message: String) {
    live_message.update(|(id, text)| {
        *id = id.saturating_add(1);
        *text = message;
    });
}
