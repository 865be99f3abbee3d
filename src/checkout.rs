// src/checkout.rs - Checkout state machine: cart -> processing -> success

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::backend::BackendArc;
use crate::cart::CartStore;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::model::{OrderHeader, OrderLine, OrderStatus};
use crate::status::{StatusChannel, StatusKind};
use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStage {
    Cart,
    Processing,
    Success,
}

/// Payer details collected in the cart drawer.
///
/// All four fields are required before submission; whitespace-only input
/// counts as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl PayerForm {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(field, format!("{field} is required")));
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What a submission attempt resolved to.
///
/// Failures are reported through the status channel, not raised: the
/// caller only branches on the handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Required fields missing; no backend call was made
    ValidationFailed,
    /// The order exists server-side; hand off to the payment-details
    /// surface under this readable id
    OrderPlaced { readable_id: String },
    /// The order-placement call failed; the cart is untouched
    BackendFailed,
}

#[derive(Debug, Clone)]
struct FlowState {
    stage: CheckoutStage,
    form: PayerForm,
    shipping_fee: Money,
    order_id: String,
}

/// Orchestrates checkout from a populated cart through order submission
/// to the manual-payment confirmation and success acknowledgment.
///
/// The flow never sticks in `Processing`: both resolutions of a
/// submission return the stage to `Cart` after a short pacing delay
/// (configurable; zero in tests). Duplicate submission after an ambiguous
/// failure is possible: no idempotency key exists in the order procedure,
/// so resubmission is left to the user.
#[derive(Clone)]
pub struct CheckoutFlow {
    backend: BackendArc,
    cart: CartStore,
    status: StatusChannel,
    state: Arc<RwLock<FlowState>>,
    stage_reset_delay: Duration,
    shipping_fee_fallback: Money,
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("stage", &self.stage())
            .finish()
    }
}

impl CheckoutFlow {
    pub fn new(
        backend: BackendArc,
        cart: CartStore,
        status: StatusChannel,
        config: &StoreConfig,
    ) -> Self {
        Self {
            backend,
            cart,
            status,
            state: Arc::new(RwLock::new(FlowState {
                stage: CheckoutStage::Cart,
                form: PayerForm::default(),
                shipping_fee: config.shipping_fee_fallback,
                order_id: String::new(),
            })),
            stage_reset_delay: config.stage_reset_delay(),
            shipping_fee_fallback: config.shipping_fee_fallback,
        }
    }

    pub fn stage(&self) -> CheckoutStage {
        self.state.read().stage
    }

    pub fn payer_form(&self) -> PayerForm {
        self.state.read().form.clone()
    }

    pub fn set_payer_form(&self, form: PayerForm) {
        self.state.write().form = form;
    }

    /// The captured readable order id; empty until an order was placed
    pub fn order_id(&self) -> String {
        self.state.read().order_id.clone()
    }

    pub fn shipping_fee(&self) -> Money {
        self.state.read().shipping_fee
    }

    /// Cart total plus the flat shipping fee
    pub fn order_total(&self) -> Money {
        self.cart.total_price() + self.shipping_fee()
    }

    /// Reads the server-held shipping fee, once per cart-drawer mount.
    ///
    /// A failed or empty read keeps the configured fallback.
    pub async fn load_shipping_fee(&self) {
        match self.backend.fetch_shipping_fee().await {
            Ok(Some(fee)) => self.state.write().shipping_fee = fee,
            Ok(None) => self.state.write().shipping_fee = self.shipping_fee_fallback,
            Err(e) => {
                tracing::warn!("shipping fee lookup failed, using fallback: {}", e);
                self.state.write().shipping_fee = self.shipping_fee_fallback;
            }
        }
    }

    /// Submits the cart as an order.
    ///
    /// Validation failures keep the stage at `Cart` and never reach the
    /// backend. On success the cart is cleared immediately and the stage
    /// passes through `Success` before resetting to `Cart` in the
    /// background so a reopened cart sheet starts fresh. On failure the
    /// cart is kept so the user can retry.
    pub async fn submit(&self) -> SubmitOutcome {
        let (form, fee) = {
            let state = self.state.read();
            (state.form.clone(), state.shipping_fee)
        };

        if form.validate().is_err() {
            self.status.show_status(
                StatusKind::Error,
                "Details Missing",
                "Please fill in all details (including email) before proceeding.",
            );
            return SubmitOutcome::ValidationFailed;
        }
        if self.cart.is_empty() {
            self.status.show_status(
                StatusKind::Error,
                "Cart Empty",
                "Add something to your cart before checking out.",
            );
            return SubmitOutcome::ValidationFailed;
        }

        self.state.write().stage = CheckoutStage::Processing;

        let header = OrderHeader {
            customer_name: form.name,
            customer_email: form.email,
            customer_phone: form.phone,
            shipping_address: form.address,
            total: self.cart.total_price() + fee,
            shipping_fee: fee,
            status: OrderStatus::Pending,
        };
        // Snapshot prices go out verbatim; catalog drift is never re-applied.
        let lines: Vec<OrderLine> = self
            .cart
            .lines()
            .into_iter()
            .map(|l| OrderLine {
                id: l.id,
                quantity: l.quantity,
                price: l.price,
            })
            .collect();

        match self.backend.place_order(header, lines).await {
            Ok(order) => {
                self.cart.clear();
                {
                    let mut state = self.state.write();
                    state.order_id = order.readable_id.clone();
                    state.stage = CheckoutStage::Success;
                }
                tokio::time::sleep(self.stage_reset_delay).await;
                self.state.write().stage = CheckoutStage::Cart;
                SubmitOutcome::OrderPlaced {
                    readable_id: order.readable_id,
                }
            }
            Err(e) => {
                tracing::error!("order creation failed: {}", e);
                self.status.show_status(
                    StatusKind::Error,
                    "Order Failed",
                    "Could not process your order. Please try again.",
                );
                tokio::time::sleep(self.stage_reset_delay).await;
                self.state.write().stage = CheckoutStage::Cart;
                SubmitOutcome::BackendFailed
            }
        }
    }

    /// The user asserts payment was made on the payment-details surface;
    /// re-display the success screen with the captured order id.
    pub fn confirm_payment(&self) {
        self.state.write().stage = CheckoutStage::Success;
    }

    /// Explicit close of the success screen: clears cart and payer form
    /// unconditionally and returns to `Cart`. Idempotent.
    pub fn close_success(&self) {
        self.cart.clear();
        let mut state = self.state.write();
        state.form.clear();
        state.stage = CheckoutStage::Cart;
    }
}
