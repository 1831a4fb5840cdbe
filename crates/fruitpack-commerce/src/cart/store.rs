//! Shared cart store.
//!
//! The store is owned by the application root and handed to each screen as a
//! cloned handle. All handles see the same cart. Mutation goes through the
//! operation set below; each effective change bumps the version counter and
//! is delivered to subscribers.
//!
//! The store is single-threaded (`Rc`), matching a UI event loop.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::cart::{Cart, CartLine, CartPricing};
use crate::catalog::ProductSnapshot;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartChange {
    /// A new line was created.
    Added { product_id: ProductId, quantity: u32 },
    /// An existing line's quantity changed.
    QuantityChanged { product_id: ProductId, quantity: u32 },
    /// A line was removed.
    Removed { product_id: ProductId },
    /// All lines were removed.
    Cleared { removed: usize },
}

/// A change delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEvent {
    /// Store version after the change.
    pub version: u64,
    /// The change itself.
    pub change: CartChange,
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Rc<dyn Fn(&CartEvent, &Cart)>;

struct Inner {
    cart: RefCell<Cart>,
    version: Cell<u64>,
    listeners: RefCell<Vec<(Subscription, Listener)>>,
    next_subscription: Cell<u64>,
}

/// Shared, observable cart.
///
/// Cloning a `CartStore` yields another handle to the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Rc<Inner>,
}

impl CartStore {
    /// Create an empty store.
    pub fn new(currency: Currency) -> Self {
        Self {
            inner: Rc::new(Inner {
                cart: RefCell::new(Cart::new(currency)),
                version: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// Add one unit of a product; see [`Cart::add_item`].
    pub fn add_item(&self, snapshot: ProductSnapshot) -> u32 {
        let product_id = snapshot.product_id.clone();
        let (before, after) = {
            let mut cart = self.inner.cart.borrow_mut();
            let before = cart.get(&product_id).map(|l| l.quantity);
            (before, cart.add_item(snapshot))
        };

        match before {
            None => {
                tracing::info!(product_id = %product_id, "added to cart");
                self.commit(CartChange::Added {
                    product_id,
                    quantity: after,
                });
            }
            Some(previous) if previous != after => self.commit(CartChange::QuantityChanged {
                product_id,
                quantity: after,
            }),
            Some(_) => {}
        }
        after
    }

    /// Set a line's quantity, clamped to at least one; see [`Cart::update_quantity`].
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> Option<u32> {
        self.change_quantity(product_id, |cart| cart.update_quantity(product_id, quantity))
    }

    /// Increase a line's quantity by one.
    pub fn increment(&self, product_id: &ProductId) -> Option<u32> {
        self.change_quantity(product_id, |cart| cart.increment(product_id))
    }

    /// Decrease a line's quantity by one, never below one.
    pub fn decrement(&self, product_id: &ProductId) -> Option<u32> {
        self.change_quantity(product_id, |cart| cart.decrement(product_id))
    }

    /// Remove a line if present.
    pub fn remove_item(&self, product_id: &ProductId) -> Option<CartLine> {
        let removed = self.inner.cart.borrow_mut().remove_item(product_id);
        if removed.is_some() {
            tracing::info!(product_id = %product_id, "removed from cart");
            self.commit(CartChange::Removed {
                product_id: product_id.clone(),
            });
        }
        removed
    }

    /// Empty the cart. Returns how many lines were removed.
    pub fn clear(&self) -> usize {
        let removed = self.inner.cart.borrow_mut().clear();
        if removed > 0 {
            tracing::info!(removed, "cart cleared");
            self.commit(CartChange::Cleared { removed });
        }
        removed
    }

    /// Current total, recomputed on every call.
    pub fn total(&self) -> Money {
        self.inner.cart.borrow().total()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.inner.cart.borrow().item_count()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.inner.cart.borrow().len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.cart.borrow().is_empty()
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.inner.cart.borrow().currency()
    }

    /// Copy of a line.
    pub fn get(&self, product_id: &ProductId) -> Option<CartLine> {
        self.inner.cart.borrow().get(product_id).cloned()
    }

    /// Copy of all lines in cart order.
    pub fn lines(&self) -> Vec<CartLine> {
        self.inner.cart.borrow().lines().to_vec()
    }

    /// Pricing breakdown.
    pub fn pricing(&self) -> CartPricing {
        self.inner.cart.borrow().pricing()
    }

    /// Copy of the whole cart.
    pub fn snapshot(&self) -> Cart {
        self.inner.cart.borrow().clone()
    }

    /// Read the cart without copying it.
    pub fn with<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&self.inner.cart.borrow())
    }

    /// Number of effective changes since creation.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Register a change listener.
    ///
    /// Listeners run synchronously after each change with a copy of the
    /// updated cart. No store borrow is held while they run, so a listener
    /// may read or mutate the store and may (un)subscribe. Listeners added
    /// during a notification first hear the next change.
    pub fn subscribe(&self, listener: impl Fn(&CartEvent, &Cart) + 'static) -> Subscription {
        let id = Subscription(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a change listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription);
        listeners.len() < before
    }

    /// Check if two handles point at the same store.
    pub fn same_store(&self, other: &CartStore) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn change_quantity(
        &self,
        product_id: &ProductId,
        op: impl FnOnce(&mut Cart) -> Option<u32>,
    ) -> Option<u32> {
        let (before, after) = {
            let mut cart = self.inner.cart.borrow_mut();
            let before = cart.get(product_id).map(|l| l.quantity);
            (before, op(&mut cart))
        };

        if let (Some(previous), Some(quantity)) = (before, after) {
            if previous != quantity {
                self.commit(CartChange::QuantityChanged {
                    product_id: product_id.clone(),
                    quantity,
                });
            }
        }
        after
    }

    fn commit(&self, change: CartChange) {
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        tracing::debug!(version, change = ?change, "cart changed");

        let event = CartEvent { version, change };
        let cart = self.inner.cart.borrow().clone();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&event, &cart);
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &*self.inner.cart.borrow())
            .field("version", &self.inner.version.get())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str, name: &str, minor: i64) -> ProductSnapshot {
        ProductSnapshot::new(id, name, Money::new(minor, Currency::ZAR))
    }

    fn recorder(store: &CartStore) -> Rc<RefCell<Vec<CartEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_handles_share_one_cart() {
        let store = CartStore::new(Currency::ZAR);
        let detail_screen = store.clone();
        let cart_screen = store.clone();

        detail_screen.add_item(snapshot("p1", "Apple", 120));
        assert_eq!(cart_screen.item_count(), 1);
        assert!(cart_screen.same_store(&detail_screen));
    }

    #[test]
    fn test_events_follow_mutations() {
        let store = CartStore::new(Currency::ZAR);
        let events = recorder(&store);
        let p1 = ProductId::new("p1");

        store.add_item(snapshot("p1", "Apple", 120));
        store.add_item(snapshot("p1", "Apple", 120));
        store.update_quantity(&p1, 5);
        store.remove_item(&p1);
        store.add_item(snapshot("p2", "Banana", 80));
        store.clear();

        let changes: Vec<_> = events.borrow().iter().map(|e| e.change.clone()).collect();
        assert_eq!(
            changes,
            vec![
                CartChange::Added { product_id: p1.clone(), quantity: 1 },
                CartChange::QuantityChanged { product_id: p1.clone(), quantity: 2 },
                CartChange::QuantityChanged { product_id: p1.clone(), quantity: 5 },
                CartChange::Removed { product_id: p1 },
                CartChange::Added { product_id: ProductId::new("p2"), quantity: 1 },
                CartChange::Cleared { removed: 1 },
            ]
        );
        assert_eq!(store.version(), 6);
    }

    #[test]
    fn test_noops_do_not_notify() {
        let store = CartStore::new(Currency::ZAR);
        let events = recorder(&store);
        let p1 = ProductId::new("p1");

        store.remove_item(&p1);
        store.update_quantity(&p1, 3);
        store.clear();
        store.add_item(snapshot("p1", "Apple", 120));
        store.decrement(&p1);
        store.update_quantity(&p1, 1);

        assert_eq!(events.borrow().len(), 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_listener_sees_updated_cart() {
        let store = CartStore::new(Currency::ZAR);
        let totals = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&totals);
        store.subscribe(move |_, cart| sink.borrow_mut().push(cart.total().amount_minor));

        store.add_item(snapshot("p1", "Apple", 120));
        store.add_item(snapshot("p1", "Apple", 120));
        store.clear();

        assert_eq!(*totals.borrow(), vec![120, 240, 0]);
    }

    #[test]
    fn test_listener_may_read_store() {
        let store = CartStore::new(Currency::ZAR);
        let reader = store.clone();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        store.subscribe(move |_, _| sink.set(reader.item_count()));

        store.add_item(snapshot("p1", "Apple", 120));
        store.add_item(snapshot("p1", "Apple", 120));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let store = CartStore::new(Currency::ZAR);
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let sub = store.subscribe(move |_, _| sink.set(sink.get() + 1));

        store.add_item(snapshot("p1", "Apple", 120));
        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.add_item(snapshot("p1", "Apple", 120));

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_listener_unsubscribes_itself_on_clear() {
        let store = CartStore::new(Currency::ZAR);
        let handle = store.clone();
        let slot: Rc<Cell<Option<Subscription>>> = Rc::new(Cell::new(None));
        let heard = Rc::new(Cell::new(0));

        let sub = {
            let slot = Rc::clone(&slot);
            let heard = Rc::clone(&heard);
            store.subscribe(move |event, _| {
                heard.set(heard.get() + 1);
                if let CartChange::Cleared { .. } = event.change {
                    if let Some(id) = slot.take() {
                        assert!(handle.unsubscribe(id));
                    }
                }
            })
        };
        slot.set(Some(sub));

        store.add_item(snapshot("p1", "Apple", 120));
        store.clear();
        store.add_item(snapshot("p2", "Banana", 80));

        assert_eq!(heard.get(), 2);
        assert!(!store.unsubscribe(sub));
    }

    #[test]
    fn test_listener_may_mutate_and_subscribe() {
        let store = CartStore::new(Currency::ZAR);
        let handle = store.clone();
        let late = Rc::new(Cell::new(0));
        let late_sink = Rc::clone(&late);
        store.subscribe(move |event, _| {
            if let CartChange::Added { product_id, .. } = &event.change {
                if product_id.as_str() == "p1" {
                    handle.add_item(snapshot("p2", "Banana", 80));
                    let sink = Rc::clone(&late_sink);
                    handle.subscribe(move |_, _| sink.set(sink.get() + 1));
                }
            }
        });

        store.add_item(snapshot("p1", "Apple", 120));
        assert_eq!(store.len(), 2);
        assert_eq!(store.total().amount_minor, 200);

        store.clear();
        assert_eq!(late.get(), 1);
    }

    #[test]
    fn test_foreign_price_counts_in_cart_currency() {
        let store = CartStore::new(Currency::ZAR);
        store.add_item(snapshot("p1", "Apple", 120));
        store.add_item(ProductSnapshot::new(
            "p2",
            "Banana",
            Money::new(100, Currency::USD),
        ));

        let pricing = store.pricing();
        let summed: i64 = pricing.lines.iter().map(|l| l.subtotal.amount_minor).sum();
        assert_eq!(store.total().amount_minor, summed);
        assert!(pricing.lines.iter().all(|l| l.unit_price.currency == Currency::ZAR));
    }
}
