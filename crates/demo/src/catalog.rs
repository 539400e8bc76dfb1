use leptos::{prelude::*, task};
use storefront::{catalog::DEFAULT_CATALOG_PATH, prelude::*};
use tracing::warn;

use crate::{announce, storage::CartHandle};

/// The catalog resource next to the current page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageCatalogSource;

impl CatalogSource for PageCatalogSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        let base = web_sys::window()
            .and_then(|window| window.location().href().ok())
            .ok_or_else(|| {
                CatalogError::Unavailable("page location is unavailable".to_string())
            })?;

        HttpCatalogSource::resolve(&base, DEFAULT_CATALOG_PATH)?
            .fetch()
            .await
    }
}

#[derive(Debug, Clone, Default)]
enum CatalogState {
    #[default]
    Loading,
    Ready(Vec<Product>),
    Failed(&'static str),
}

#[component]
fn ProductCardView(
    product: Product,
    cart: CartHandle,
    live_message: RwSignal<(u64, String)>,
) -> impl IntoView {
    let card = match ProductCard::new(&product, store_currency()) {
        Ok(card) => card,
        Err(error) => {
            warn!(id = %product.id, %error, "skipping product with an invalid price");
            return ().into_any();
        }
    };

    let add_label = format!("Agregar {} al carrito", card.name);
    let added_message = format!("{} agregado al carrito.", card.name);

    view! {
        <article class="product-card">
            <img src=card.image alt=card.image_alt />
            {card.badge.map(|badge| view! { <span class="product-badge">{badge}</span> })}
            <h3 class="product-name">{card.name}</h3>
            <p class="product-description">{card.description}</p>
            <p class="product-price">{card.price}</p>
            <button
                type="button"
                class="add-to-cart"
                aria-label=add_label
                on:click=move |_| {
                    cart.update(|store| store.add_item(&product));
                    announce(live_message, added_message.clone());
                }
            >
                "Agregar"
            </button>
        </article>
    }
    .into_any()
}

/// Catalog grid, loaded once when the page mounts.
#[component]
pub fn CatalogPage(cart: CartHandle, live_message: RwSignal<(u64, String)>) -> impl IntoView {
    let state = RwSignal::new(CatalogState::Loading);

    task::spawn_local(async move {
        let next = match load_catalog(&PageCatalogSource, IdentifierPolicy::default()).await {
            Ok(catalog) => CatalogState::Ready(catalog.into_products()),
            Err(error) => {
                warn!(%error, "failed to load catalog");
                CatalogState::Failed(error.fallback_message())
            }
        };

        state.set(next);
    });

    view! {
        <section class="catalog" aria-labelledby="catalog-title">
            <h2 id="catalog-title" class="panel-title">"Productos"</h2>
            {move || match state.get() {
                CatalogState::Loading => {
                    view! { <p class="catalog-status">"Cargando productos..."</p> }.into_any()
                }
                CatalogState::Failed(message) => {
                    view! { <p class="catalog-status">{message}</p> }.into_any()
                }
                CatalogState::Ready(products) => {
                    view! {
                        <div class="product-grid">
                            {products
                                .into_iter()
                                .map(|product| {
                                    view! {
                                        <ProductCardView
                                            product=product
                                            cart=cart
                                            live_message=live_message
                                        />
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}
