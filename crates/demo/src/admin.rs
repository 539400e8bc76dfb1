use std::str::FromStr;

use leptos::{ev::SubmitEvent, prelude::*, task};
use rust_decimal::Decimal;
use storefront::{pricing::money_from_decimal, prelude::*};

use crate::{
    catalog::PageCatalogSource,
    storage::{PageStorage, Shared},
};

/// Raw values of the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FormFields {
    name: String,
    price: String,
    off: String,
    description: String,
    image: String,
}

impl FormFields {
    fn from_product(product: &AdminProduct) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            off: product.off.to_string(),
            description: product.description.clone(),
            image: String::new(),
        }
    }

    fn to_draft(&self) -> Result<ProductDraft, String> {
        let price = Decimal::from_str(self.price.trim().replace(',', ".").as_str())
            .map_err(|_error| "Ingresá un precio válido.".to_string())?;

        let off = match self.off.trim() {
            "" => 0,
            off => off
                .parse::<u8>()
                .map_err(|_error| "Ingresá un descuento entre 0 y 100.".to_string())?,
        };

        let image = Some(self.image.trim().to_string()).filter(|image| !image.is_empty());

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            price,
            off,
            description: self.description.trim().to_string(),
            image,
        })
    }
}

fn created_message(product: &AdminProduct) -> String {
    format!(
        "🎉 Producto \"{}\" cargado con éxito! ID: {}",
        product.name, product.id
    )
}

fn updated_message(product: &AdminProduct) -> String {
    format!(
        "✅ Producto \"{}\" (ID: {}) actualizado con éxito!",
        product.name, product.id
    )
}

fn delete_prompt(product: &AdminProduct) -> String {
    format!(
        "¿Estás seguro de que quieres eliminar el producto \"{}\" (ID: {})? \
         Esta acción es irreversible.",
        product.name, product.id
    )
}

fn deleted_message(product: &AdminProduct) -> String {
    format!("🗑️ Producto \"{}\" eliminado correctamente.", product.name)
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// The admin store opened for this page, mirrored into a signal for rendering.
///
/// The store is kept until the page goes away, so identifiers keep growing after deletes and a
/// failed write does not lose the list.
struct AdminSession<S: 'static = PageStorage> {
    store: Shared<Option<AdminStore<S>>>,
    products: RwSignal<Vec<AdminProduct>>,
}

impl<S: KeyValueStore + 'static> AdminSession<S> {
    fn new() -> Self {
        Self {
            store: Shared::new(None),
            products: RwSignal::new(Vec::new()),
        }
    }

    fn attach(&self, store: AdminStore<S>) {
        self.products.set(store.products().to_vec());
        self.store.update(|slot| *slot = Some(store));
    }

    /// Run one operation, or `None` while the list is still loading.
    fn update<R>(&self, operation: impl FnOnce(&mut AdminStore<S>) -> R) -> Option<R> {
        self.store.update(|slot| {
            let store = slot.as_mut()?;
            let result = operation(store);
            self.products.set(store.products().to_vec());

            Some(result)
        })
    }
}

impl<S: 'static> Clone for AdminSession<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static> Copy for AdminSession<S> {}

#[component]
fn ProductRow(
    product: AdminProduct,
    session: AdminSession,
    editing: RwSignal<Option<u64>>,
    fields: RwSignal<FormFields>,
    notice: RwSignal<Option<String>>,
) -> impl IntoView {
    let price = money_from_decimal(product.price, store_currency())
        .map(|price| format_money(&price))
        .unwrap_or_else(|_error| product.price.to_string());

    let for_edit = product.clone();
    let for_delete = product.clone();

    view! {
        <tr>
            <td data-label="ID">{product.id}</td>
            <td data-label="Nombre">{product.name}</td>
            <td data-label="Precio">{price}</td>
            <td data-label="Descuento">{format!("{}%", product.off)}</td>
            <td data-label="Acciones">
                <button
                    type="button"
                    class="action-btn btn-edit"
                    on:click=move |_| {
                        editing.set(Some(for_edit.id));
                        fields.set(FormFields::from_product(&for_edit));
                    }
                >
                    "✏️ Editar"
                </button>
                <button
                    type="button"
                    class="action-btn btn-delete"
                    on:click=move |_| {
                        if !confirm(&delete_prompt(&for_delete)) {
                            return;
                        }

                        let id = for_delete.id;

                        match session.update(|store| store.delete(id)) {
                            Some(Ok(removed)) => {
                                if editing.get_untracked() == Some(id) {
                                    editing.set(None);
                                    fields.set(FormFields::default());
                                }

                                notice.set(Some(deleted_message(&removed)));
                            }
                            Some(Err(error)) => notice.set(Some(error.to_string())),
                            None => {}
                        }
                    }
                >
                    "🗑️ Eliminar"
                </button>
            </td>
        </tr>
    }
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    fields: RwSignal<FormFields>,
    get: fn(&FormFields) -> &String,
    set: fn(&mut FormFields, String),
    #[prop(default = "text")] input_type: &'static str,
) -> impl IntoView {
    view! {
        <label for=id>{label}</label>
        <input
            id=id
            type=input_type
            prop:value=move || fields.with(|fields| get(fields).clone())
            on:input=move |event| {
                let value = event_target_value(&event);
                fields.update(|fields| set(fields, value));
            }
        />
    }
}

/// Product maintenance screen.
#[component]
pub fn AdminPage() -> impl IntoView {
    let session = AdminSession::new();
    let editing = RwSignal::new(None::<u64>);
    let fields = RwSignal::new(FormFields::default());
    let notice = RwSignal::new(None::<String>);

    task::spawn_local(async move {
        session.attach(AdminStore::open(PageStorage::open(), &PageCatalogSource).await);
    });

    let reset_form = move || {
        editing.set(None);
        fields.set(FormFields::default());
    };

    let submit = move |event: SubmitEvent| {
        event.prevent_default();

        let draft = match fields.with_untracked(FormFields::to_draft) {
            Ok(draft) => draft,
            Err(message) => {
                notice.set(Some(message));
                return;
            }
        };

        let outcome = match editing.get_untracked() {
            Some(id) => session.update(|store| store.update(id, draft).map(updated_message)),
            None => session.update(|store| store.create(draft).map(created_message)),
        };

        match outcome {
            Some(Ok(message)) => {
                notice.set(Some(message));
                reset_form();
            }
            Some(Err(error)) => notice.set(Some(error.to_string())),
            None => {}
        }
    };

    let submit_label = move || match editing.get() {
        Some(id) => format!("✍️ Actualizar Producto ID {id}"),
        None => "✨ Guardar Producto ✨".to_string(),
    };

    view! {
        <section class="admin" aria-labelledby="admin-title">
            <h2 id="admin-title" class="panel-title">"Administrar productos"</h2>
            <p class="admin-notice" role="status">{move || notice.get()}</p>
            <form class="product-form" on:submit=submit>
                <TextField
                    id="name"
                    label="Nombre"
                    fields=fields
                    get=|fields| &fields.name
                    set=|fields, value| fields.name = value
                />
                <TextField
                    id="price"
                    label="Precio"
                    input_type="number"
                    fields=fields
                    get=|fields| &fields.price
                    set=|fields, value| fields.price = value
                />
                <TextField
                    id="off"
                    label="Descuento (%)"
                    input_type="number"
                    fields=fields
                    get=|fields| &fields.off
                    set=|fields, value| fields.off = value
                />
                <TextField
                    id="description"
                    label="Descripción"
                    fields=fields
                    get=|fields| &fields.description
                    set=|fields, value| fields.description = value
                />
                <TextField
                    id="image"
                    label="Imagen"
                    fields=fields
                    get=|fields| &fields.image
                    set=|fields, value| fields.image = value
                />
                <button type="submit" id="submit-button">{submit_label}</button>
                <Show when=move || editing.with(Option::is_some)>
                    <button type="button" class="cancel-edit" on:click=move |_| reset_form()>
                        "Cancelar"
                    </button>
                </Show>
            </form>
            <table class="product-table">
                <thead>
                    <tr>
                        <th>"ID"</th>
                        <th>"Nombre"</th>
                        <th>"Precio"</th>
                        <th>"Descuento"</th>
                        <th>"Acciones"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        session
                            .products
                            .get()
                            .into_iter()
                            .map(|product| {
                                view! {
                                    <ProductRow
                                        product=product
                                        session=session
                                        editing=editing
                                        fields=fields
                                        notice=notice
                                    />
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use leptos::reactive::owner::Owner;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn blank_optional_fields_default() -> TestResult {
        let fields = FormFields {
            name: " Taza ".to_string(),
            price: "1200,50".to_string(),
            off: String::new(),
            description: String::new(),
            image: "  ".to_string(),
        };

        let draft = fields.to_draft()?;

        assert_eq!(draft.name, "Taza");
        assert_eq!(draft.price, Decimal::new(120_050, 2));
        assert_eq!(draft.off, 0);
        assert_eq!(draft.image, None);

        Ok(())
    }

    #[test]
    fn unparsable_numbers_are_reported() {
        let fields = FormFields {
            name: "Taza".to_string(),
            price: "doce".to_string(),
            ..FormFields::default()
        };

        assert_eq!(fields.to_draft(), Err("Ingresá un precio válido.".to_string()));

        let fields = FormFields {
            name: "Taza".to_string(),
            price: "12".to_string(),
            off: "300".to_string(),
            ..FormFields::default()
        };

        assert_eq!(
            fields.to_draft(),
            Err("Ingresá un descuento entre 0 y 100.".to_string())
        );
    }

    #[test]
    fn editing_starts_from_current_values() {
        let product = sample_products().remove(0);
        let fields = FormFields::from_product(&product);

        assert_eq!(fields.name, "Vasos Personalizados");
        assert_eq!(fields.off, "20");
        assert!(fields.image.is_empty());
    }

    #[test]
    fn messages_name_the_product() {
        let product = sample_products().remove(1);

        assert_eq!(
            created_message(&product),
            "🎉 Producto \"Cono de Helado Mágico\" cargado con éxito! ID: 2"
        );
        assert_eq!(
            deleted_message(&product),
            "🗑️ Producto \"Cono de Helado Mágico\" eliminado correctamente."
        );
        assert!(delete_prompt(&product).contains("(ID: 2)"));
        assert!(updated_message(&product).contains("actualizado con éxito"));
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Decimal::new(1200, 0),
            off: 0,
            description: String::new(),
            image: None,
        }
    }

    #[test]
    fn session_keeps_ids_growing_after_delete() -> TestResult {
        let storage = MemoryStore::new();
        storage.set(ADMIN_STORAGE_KEY, "[]")?;
        let Ok(store) = AdminStore::load(storage) else {
            panic!("expected stored list");
        };

        Owner::new().with(|| -> TestResult {
            let session = AdminSession::new();

            assert_eq!(session.update(|store| store.next_id()), None);

            session.attach(store);
            session
                .update(|store| store.create(draft("Taza")).map(|p| p.id))
                .ok_or("detached")??;
            session
                .update(|store| store.create(draft("Plato")).map(|p| p.id))
                .ok_or("detached")??;
            session
                .update(|store| store.delete(2))
                .ok_or("detached")??;

            let created = session
                .update(|store| store.create(draft("Vaso")).map(|p| p.id))
                .ok_or("detached")??;

            assert_eq!(created, 3);

            let ids: Vec<_> = session
                .products
                .with_untracked(|products| products.iter().map(|product| product.id).collect());

            assert_eq!(ids, vec![1, 3]);

            Ok(())
        })
    }
}
