use leptos::prelude::*;
use rusty_money::{Money, iso::Currency};
use storefront::prelude::*;
use tracing::warn;

use crate::{announce, checkout::open_checkout, storage::CartHandle};

fn money_text(amount: Result<Money<'static, Currency>, PricingError>) -> String {
    match amount {
        Ok(amount) => format_money(&amount),
        Err(error) => {
            warn!(%error, "failed to price cart");
            "—".to_string()
        }
    }
}

#[component]
fn CartRow(
    line: CartLine,
    cart: CartHandle,
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let currency = store_currency();
    let unit_price = money_text(line.unit_price(currency));
    let subtotal = money_text(line.subtotal(currency));

    let decrement_id = line.id().clone();
    let increment_id = line.id().clone();
    let remove_id = line.id().clone();
    let removed_message = format!("{} eliminado del carrito.", line.product.name);

    view! {
        <tr>
            <td data-label="Producto">
                <img
                    class="cart-thumb"
                    src=line.image().to_string()
                    alt=line.product.name.clone()
                />
                <span>{line.product.name.clone()}</span>
            </td>
            <td data-label="Precio">{unit_price}</td>
            <td data-label="Cantidad">
                <div class="quantity-controls">
                    <button
                        type="button"
                        class="quantity-button"
                        aria-label="Quitar una unidad"
                        on:click=move |_| {
                            cart.update(|store| {
                                store.change_quantity(&decrement_id, QuantityChange::Decrement)
                            });
                        }
                    >
                        "−"
                    </button>
                    <span class="quantity">{line.quantity}</span>
                    <button
                        type="button"
                        class="quantity-button"
                        aria-label="Agregar una unidad"
                        on:click=move |_| {
                            cart.update(|store| {
                                store.change_quantity(&increment_id, QuantityChange::Increment)
                            });
                        }
                    >
                        "+"
                    </button>
                </div>
            </td>
            <td data-label="Subtotal">{subtotal}</td>
            <td data-label="Acciones">
                <button
                    type="button"
                    class="remove-button"
                    on:click=move |_| {
                        cart.update(|store| store.remove_item(&remove_id));
                        announce(live_message, removed_message.clone());
                    }
                >
                    "Eliminar"
                </button>
            </td>
        </tr>
    }
}

fn render_lines(
    snapshot: &Cart,
    cart: CartHandle,
    live_message: RwSignal<(u64, String)>,
) -> AnyView {
    if snapshot.is_empty() {
        return view! { <p class="empty-cart-message">{EMPTY_CART_MESSAGE}</p> }.into_any();
    }

    let rows = snapshot
        .lines()
        .iter()
        .cloned()
        .map(|line| view! { <CartRow line=line cart=cart live_message=live_message /> })
        .collect_view();

    view! {
        <table class="cart-table">
            <thead>
                <tr>
                    <th>"Producto"</th>
                    <th>"Precio"</th>
                    <th>"Cantidad"</th>
                    <th>"Subtotal"</th>
                    <th>"Acciones"</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
    .into_any()
}

/// Cart table, total and checkout trigger.
#[component]
pub fn CartPage(
    cart: CartHandle,
    checkout: RwSignal<Checkout>,
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    view! {
        <section class="cart" aria-labelledby="cart-title">
            <h2 id="cart-title" class="panel-title">"Tu carrito"</h2>
            {move || cart.with(|snapshot| render_lines(snapshot, cart, live_message))}
            <p class="cart-total">
                <span>"Total"</span>
                <span id="cart-total-amount">
                    {move || {
                        cart.with(|snapshot| money_text(snapshot.total_amount(store_currency())))
                    }}
                </span>
            </p>
            <div class="cart-actions">
                <button
                    type="button"
                    class="clear-cart"
                    on:click=move |_| {
                        cart.update(CartStore::clear);
                    }
                >
                    "Vaciar carrito"
                </button>
                <button
                    type="button"
                    class="checkout-button"
                    on:click=move |_| open_checkout(cart, checkout)
                >
                    "Finalizar compra"
                </button>
            </div>
        </section>
    }
}
