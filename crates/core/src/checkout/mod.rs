//! Checkout
//!
//! The checkout modal moves `Idle → ModalOpen → Submitted → Idle`. Opening needs a non-empty
//! cart; submitting needs a phone number and clears the cart.

use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, store::CartStore},
    storage::KeyValueStore,
};

pub mod contact;

use contact::{ContactForm, ValidationError};

/// How long the confirmation stays up before the modal closes itself.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(4);

/// Checkout errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Checkout was triggered with nothing in the cart.
    #[error("¡No puedes finalizar la compra con el carrito vacío!")]
    EmptyCart,

    /// The contact form was submitted while the modal was closed.
    #[error("the checkout form is not open")]
    NotOpen,

    /// The contact form was already submitted.
    #[error("the contact details were already submitted")]
    AlreadySubmitted,

    /// A contact field was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Confirmation shown after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Phone number the customer will be called at
    pub phone: String,

    /// Email address, when given
    pub email: Option<String>,
}

impl Confirmation {
    /// User-facing confirmation message.
    pub fn message(&self) -> String {
        format!(
            "¡Datos enviados con éxito! Te contactaremos al {}.",
            self.phone
        )
    }
}

/// Checkout modal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// Modal closed.
    #[default]
    Idle,

    /// Modal open, waiting for contact details.
    ModalOpen,

    /// Contact details accepted; the form is disabled until the modal closes.
    Submitted(Confirmation),
}

/// Checkout flow.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    /// Create a closed checkout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Whether the modal is showing.
    pub fn is_open(&self) -> bool {
        !matches!(self.state, CheckoutState::Idle)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, CheckoutState::ModalOpen)
    }

    /// Confirmation to display, once submitted.
    pub fn confirmation(&self) -> Option<&Confirmation> {
        match &self.state {
            CheckoutState::Submitted(confirmation) => Some(confirmation),
            CheckoutState::Idle | CheckoutState::ModalOpen => None,
        }
    }

    /// Open the modal. Opening an already open modal changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] and stays closed when `cart` has no lines.
    pub fn open(&mut self, cart: &Cart) -> Result<(), CheckoutError> {
        if self.is_open() {
            return Ok(());
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::ModalOpen;

        Ok(())
    }

    /// Submit the contact form, clearing the cart on success.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::NotOpen`]: the modal is closed.
    /// - [`CheckoutError::AlreadySubmitted`]: the form was already accepted.
    /// - [`CheckoutError::Validation`]: a field was rejected; the modal stays open.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        form: &ContactForm,
        store: &mut CartStore<S>,
    ) -> Result<&Confirmation, CheckoutError> {
        match self.state {
            CheckoutState::Idle => return Err(CheckoutError::NotOpen),
            CheckoutState::Submitted(_) => return Err(CheckoutError::AlreadySubmitted),
            CheckoutState::ModalOpen => {}
        }

        form.validate()?;

        info!(
            phone = form.phone(),
            items = store.total_item_count(),
            "checkout submitted"
        );

        store.clear();

        self.state = CheckoutState::Submitted(Confirmation {
            phone: form.phone().to_string(),
            email: form.email().map(str::to_string),
        });

        self.confirmation().ok_or(CheckoutError::NotOpen)
    }

    /// Close the modal, resetting the form. Returns whether the modal was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = CheckoutState::Idle;

        was_open
    }

    /// Handle a click on the backdrop outside the modal body.
    pub fn backdrop_click(&mut self) -> bool {
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        checkout::contact::{ContactField, ValidationReason},
        products::{Product, ProductId},
        storage::MemoryStore,
    };

    use super::*;

    fn store_with_item() -> CartStore<MemoryStore> {
        let mut store = CartStore::load(MemoryStore::new());
        store.add_item(&Product {
            id: ProductId::from("A"),
            name: "A".to_string(),
            price: Decimal::new(1000, 0),
            off: 0,
            description: String::new(),
            image: String::new(),
        });

        store
    }

    #[test]
    fn open_refuses_empty_cart() {
        let mut checkout = Checkout::new();

        assert_eq!(checkout.open(&Cart::new()), Err(CheckoutError::EmptyCart));
        assert_eq!(checkout.state(), &CheckoutState::Idle);
    }

    #[test]
    fn submit_requires_open_modal() {
        let mut store = store_with_item();
        let mut checkout = Checkout::new();

        let result = checkout.submit(&ContactForm::with_phone("1234"), &mut store);

        assert_eq!(result, Err(CheckoutError::NotOpen));
        assert_eq!(store.total_item_count(), 1);
    }

    #[test]
    fn blank_phone_keeps_modal_open_and_cart_intact() -> TestResult {
        let mut store = store_with_item();
        let mut checkout = Checkout::new();
        checkout.open(store.cart())?;

        let result = checkout.submit(&ContactForm::with_phone(""), &mut store);

        assert!(
            matches!(
                result,
                Err(CheckoutError::Validation(contact::ValidationError {
                    field: ContactField::Phone,
                    reason: ValidationReason::Required,
                }))
            ),
            "expected phone validation error, got {result:?}"
        );
        assert!(checkout.can_submit());
        assert_eq!(store.total_item_count(), 1);

        Ok(())
    }

    #[test]
    fn backdrop_click_closes_open_modal() -> TestResult {
        let store = store_with_item();
        let mut checkout = Checkout::new();

        assert!(!checkout.backdrop_click());

        checkout.open(store.cart())?;

        assert!(checkout.backdrop_click());
        assert!(!checkout.is_open());

        Ok(())
    }

    #[test]
    fn backdrop_click_closes_after_submission() -> TestResult {
        let mut store = store_with_item();
        let mut checkout = Checkout::new();
        checkout.open(store.cart())?;
        checkout.submit(&ContactForm::with_phone("1234"), &mut store)?;

        assert!(!checkout.can_submit());
        assert!(checkout.backdrop_click());
        assert_eq!(checkout.state(), &CheckoutState::Idle);
        assert!(checkout.confirmation().is_none());

        Ok(())
    }

    #[test]
    fn confirmation_message_includes_phone() {
        let confirmation = Confirmation {
            phone: "1234".to_string(),
            email: None,
        };

        assert_eq!(
            confirmation.message(),
            "¡Datos enviados con éxito! Te contactaremos al 1234."
        );
    }
}
