//! Cart store behaviour over shared storage

use rust_decimal::Decimal;
use rusty_money::{Money, iso::ARS};
use storefront::prelude::*;
use testresult::TestResult;

fn product(id: &str, price: i64) -> Product {
    Product {
        id: ProductId::from(id),
        name: format!("Producto {id}"),
        price: Decimal::new(price, 0),
        off: 0,
        description: String::new(),
        image: format!("{id}.jpg"),
    }
}

#[test]
fn repeated_adds_increment_a_single_line() -> TestResult {
    let mut store = CartStore::load(MemoryStore::new());
    let a = product("A", 1000);

    store.add_item(&a);
    let event = store.add_item(&a);

    assert_eq!(
        event,
        CartEvent::Added {
            id: a.id.clone(),
            quantity: 2
        }
    );
    assert_eq!(store.cart().len(), 1);
    assert_eq!(store.total_item_count(), 2);
    assert_eq!(store.total_amount()?, Money::from_minor(2000_00, ARS));

    Ok(())
}

#[test]
fn item_count_matches_number_of_adds() {
    let mut store = CartStore::load(MemoryStore::new());
    let products = [product("A", 1), product("B", 2), product("C", 3)];

    let mut adds = 0_u64;

    for item in products.iter().cycle().take(7) {
        store.add_item(item);
        adds += 1;

        assert_eq!(store.total_item_count(), adds);
    }

    assert_eq!(store.cart().len(), 3);
}

#[test]
fn decrement_at_one_removes_the_line() {
    let mut store = CartStore::load(MemoryStore::new());
    let a = product("A", 1000);
    store.add_item(&a);

    let event = store.change_quantity(&a.id, QuantityChange::Decrement);

    assert_eq!(event, CartEvent::Removed { id: a.id.clone() });
    assert!(!store.cart().contains(&a.id));
    assert_eq!(store.total_item_count(), 0);
}

#[test]
fn unknown_identifiers_leave_the_cart_untouched() -> TestResult {
    let storage = MemoryStore::new();
    let mut store = CartStore::load(storage.clone());
    store.add_item(&product("A", 1000));

    let before = storage.get(CART_STORAGE_KEY)?;
    let missing = ProductId::from("missing");

    assert_eq!(
        store.change_quantity(&missing, QuantityChange::Increment),
        CartEvent::Unchanged
    );
    assert_eq!(store.remove_item(&missing), CartEvent::Unchanged);
    assert_eq!(storage.get(CART_STORAGE_KEY)?, before);
    assert_eq!(store.total_item_count(), 1);

    Ok(())
}

#[test]
fn clear_deletes_the_persisted_record() {
    let storage = MemoryStore::new();
    let mut store = CartStore::load(storage.clone());
    store.add_item(&product("A", 1000));

    assert!(storage.contains(CART_STORAGE_KEY));

    store.clear();

    assert!(get_cart(&storage).is_empty());
    assert!(!storage.contains(CART_STORAGE_KEY));
}

#[test]
fn a_fresh_store_reconstructs_the_cart() {
    let storage = MemoryStore::new();
    let mut store = CartStore::load(storage.clone());
    let a = product("A", 1000);
    let b = product("B", 250);

    store.add_item(&a);
    store.add_item(&b);
    store.change_quantity(&a.id, QuantityChange::Increment);

    let reloaded = CartStore::load(storage);

    assert_eq!(reloaded.cart(), store.cart());
}

#[test]
fn stored_lines_keep_the_product_copy() -> TestResult {
    let storage = MemoryStore::new();
    storage.set(
        CART_STORAGE_KEY,
        r#"[{"id": 3, "name": "Taza", "price": 1200.5, "off": 10, "description": "", "image": "taza.jpg", "quantity": 2}]"#,
    )?;

    let store = CartStore::load(storage);
    let line = store
        .cart()
        .line(&ProductId::Number(3))
        .ok_or("missing line")?;

    assert_eq!(line.quantity, 2);
    assert_eq!(line.product.name, "Taza");
    assert_eq!(store.total_amount()?, Money::from_minor(2401_00, ARS));

    Ok(())
}

#[test]
fn reload_picks_up_writes_from_another_store() {
    let storage = MemoryStore::new();
    let mut first = CartStore::load(storage.clone());
    let mut second = CartStore::load(storage);

    first.add_item(&product("A", 1000));

    assert!(second.cart().is_empty());
    assert_eq!(second.reload().total_item_count(), 1);
}
