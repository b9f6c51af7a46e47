//! Property-level change notification.
//!
//! Every entity owns a [`Notifier`] and funnels field assignment through
//! [`set`]: compare, skip when unchanged, otherwise store and raise one
//! [`PropertyChanged`] carrying the property name. Two variants forward
//! changes from owned children:
//!
//! - [`set_and_track`] for a field holding a nested observable entity,
//! - [`set_and_track_items`] for a field holding an owned collection.
//!
//! Both re-raise whatever the child reports as a change to the owning
//! property's name.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::seq::ChangeAction;
use crate::session::Session;

/// Property name meaning "treat as if every property changed".
pub const ALL_PROPERTIES: &str = "";

/// A single property-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChanged {
    pub name: &'static str,
}

impl PropertyChanged {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub const fn all() -> Self {
        Self {
            name: ALL_PROPERTIES,
        }
    }

    #[inline]
    pub fn is_all(&self) -> bool {
        self.name.is_empty()
    }

    /// Whether a view bound to `property` must refresh.
    pub fn affects(&self, property: &str) -> bool {
        self.is_all() || self.name == property
    }
}

pub(crate) type PropertyHandler = dyn Fn(&PropertyChanged);

/// Handler list shared between a source and its subscriptions.
pub(crate) struct Listeners<H: ?Sized> {
    slots: RefCell<Vec<(u64, Rc<H>)>>,
    next_id: Cell<u64>,
}

impl<H: ?Sized + 'static> Listeners<H> {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            slots: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        })
    }

    pub(crate) fn add(self: &Rc<Self>, handler: Rc<H>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.slots.borrow_mut().push((id, handler));
        let source: Weak<dyn Detach> = Rc::downgrade(self) as Weak<dyn Detach>;
        Subscription { source, id }
    }

    /// Handlers registered right now. Emission iterates this copy so a
    /// handler may subscribe, unsubscribe or emit again.
    pub(crate) fn snapshot(&self) -> Vec<Rc<H>> {
        self.slots
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().len()
    }
}

trait Detach {
    fn detach(&self, id: u64);
}

impl<H: ?Sized> Detach for Listeners<H> {
    fn detach(&self, id: u64) {
        self.slots.borrow_mut().retain(|(slot, _)| *slot != id);
    }
}

/// Registration of a change handler. Dropping it unsubscribes the handler.
#[must_use = "dropping a Subscription unsubscribes its handler"]
pub struct Subscription {
    source: Weak<dyn Detach>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(source) = self.source.upgrade() {
            source.detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.source.strong_count() > 0))
            .finish()
    }
}

/// Property-change signal owned by one entity.
///
/// Cloning yields an independent notifier with no subscribers and no
/// session, so a cloned entity never shares observers with its source.
/// Notifiers never take part in entity equality.
pub struct Notifier {
    inner: Rc<NotifierInner>,
}

struct NotifierInner {
    listeners: Rc<Listeners<PropertyHandler>>,
    session: RefCell<Option<Session>>,
    /// Load epoch for which the single "all" notification has been queued.
    deferred_epoch: Cell<Option<u64>>,
}

impl NotifierInner {
    /// Raise a change made directly on this entity.
    ///
    /// While the session loads, every change collapses into one queued
    /// "all" notification. Outside a load the change is emitted at once,
    /// including from handlers of the end-of-load notifications.
    fn raise(self: &Rc<Self>, change: PropertyChanged) {
        let session = self.session.borrow().clone();
        match session {
            Some(session) if session.is_loading() => self.defer_all(&session),
            Some(session) => session.live(|| self.emit(&change)),
            None => self.emit(&change),
        }
    }

    /// Raise a change relayed from an owned child or collection.
    ///
    /// A relay of an end-of-load notification is already covered by this
    /// entity's own "all" notification for the load.
    fn raise_forwarded(self: &Rc<Self>, change: PropertyChanged) {
        let session = self.session.borrow().clone();
        match session {
            Some(session) if session.is_replaying() => self.defer_all(&session),
            _ => self.raise(change),
        }
    }

    /// Queue the single "all" notification of the current load epoch.
    fn defer_all(self: &Rc<Self>, session: &Session) {
        let epoch = session.epoch();
        if self.deferred_epoch.replace(Some(epoch)) == Some(epoch) {
            return;
        }
        let weak = Rc::downgrade(self);
        session.defer(Box::new(move |session: &Session| {
            if let Some(inner) = weak.upgrade() {
                session.replay(|| inner.emit(&PropertyChanged::all()));
            }
        }));
    }

    fn emit(&self, change: &PropertyChanged) {
        for handler in self.listeners.snapshot() {
            handler(change);
        }
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(NotifierInner {
                listeners: Listeners::new(),
                session: RefCell::new(None),
                deferred_epoch: Cell::new(None),
            }),
        }
    }

    /// Raise a change of `name` to every subscriber, or defer it while the
    /// attached session is loading.
    pub fn raise(&self, name: &'static str) {
        self.inner.raise(PropertyChanged::new(name));
    }

    /// Raise the "every property changed" notification.
    pub fn raise_all(&self) {
        self.inner.raise(PropertyChanged::all());
    }

    pub fn subscribe(&self, handler: impl Fn(&PropertyChanged) + 'static) -> Subscription {
        self.inner.listeners.add(Rc::new(handler))
    }

    /// Re-raise every change of this notifier as a change of `name` on `owner`.
    pub fn forward_to(&self, owner: &Notifier, name: &'static str) -> Subscription {
        let owner = Rc::downgrade(&owner.inner);
        self.subscribe(move |_| {
            if let Some(owner) = owner.upgrade() {
                owner.raise_forwarded(PropertyChanged::new(name));
            }
        })
    }

    /// Bind this notifier to a session so notifications raised while the
    /// session is loading are deferred.
    pub fn attach(&self, session: &Session) {
        *self.inner.session.borrow_mut() = Some(session.clone());
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Notifier {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl PartialEq for Notifier {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Notifier {}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// The change-notification capability.
pub trait Observable {
    fn notifier(&self) -> &Notifier;

    /// Attach this value and everything it owns to a load session.
    fn attach(&self, session: &Session) {
        self.notifier().attach(session);
    }
}

/// Store `value` into `field` and raise `name` if it differs.
pub fn set<T: PartialEq>(notifier: &Notifier, field: &mut T, value: T, name: &'static str) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    notifier.raise(name);
    true
}

/// An owned child entity whose changes are forwarded to its owner.
pub struct Tracked<T> {
    value: T,
    link: Option<Subscription>,
}

impl<T: Observable> Tracked<T> {
    /// Take ownership of `value`, forwarding its changes to `owner` as `name`.
    pub fn bind(owner: &Notifier, value: T, name: &'static str) -> Self {
        let link = value.notifier().forward_to(owner, name);
        Self {
            value,
            link: Some(link),
        }
    }
}

impl<T> Tracked<T> {
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutable access; setters on the child notify the owner through the link.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// Replace a tracked child: unsubscribe the old child, subscribe the new
/// one, and raise `name` if the value changed.
pub fn set_and_track<T: Observable + PartialEq>(
    owner: &Notifier,
    field: &mut Tracked<T>,
    value: T,
    name: &'static str,
) -> bool {
    if field.value == value {
        return false;
    }
    field.link = Some(value.notifier().forward_to(owner, name));
    field.value = value;
    owner.raise(name);
    true
}

/// A collection that reports structural changes and element changes.
pub trait ObservableCollection {
    fn watch_structure(&self, handler: impl Fn(ChangeAction) + 'static) -> Subscription;

    fn watch_items(&self, handler: impl Fn(&PropertyChanged) + 'static) -> Subscription;

    fn attach_session(&self, session: &Session);
}

/// An owned collection whose structural and element changes are forwarded
/// to its owner.
pub struct TrackedItems<S> {
    value: S,
    links: Vec<Subscription>,
}

impl<S: ObservableCollection> TrackedItems<S> {
    pub fn bind(owner: &Notifier, value: S, name: &'static str) -> Self {
        let links = link_collection(owner, &value, name);
        Self { value, links }
    }
}

impl<S> TrackedItems<S> {
    pub fn get(&self) -> &S {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.value
    }
}

impl<S> Deref for TrackedItems<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.value
    }
}

impl<S: PartialEq> PartialEq for TrackedItems<S> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<S: fmt::Debug> fmt::Debug for TrackedItems<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

fn link_collection<S: ObservableCollection>(
    owner: &Notifier,
    value: &S,
    name: &'static str,
) -> Vec<Subscription> {
    let structure_owner = Rc::downgrade(&owner.inner);
    let item_owner = Rc::downgrade(&owner.inner);
    vec![
        value.watch_structure(move |_| {
            if let Some(owner) = structure_owner.upgrade() {
                owner.raise_forwarded(PropertyChanged::new(name));
            }
        }),
        value.watch_items(move |_| {
            if let Some(owner) = item_owner.upgrade() {
                owner.raise_forwarded(PropertyChanged::new(name));
            }
        }),
    ]
}

/// Replace an owned collection, moving the owner's subscriptions to the new
/// collection. A replaced collection always counts as a change.
pub fn set_and_track_items<S: ObservableCollection>(
    owner: &Notifier,
    field: &mut TrackedItems<S>,
    value: S,
    name: &'static str,
) -> bool {
    field.links = link_collection(owner, &value, name);
    field.value = value;
    owner.raise(name);
    true
}

/// Getter/setter pairs for `Copy` fields.
macro_rules! copy_props {
    ($($field:ident: $ty:ty => $setter:ident;)*) => {
        $(
            pub fn $field(&self) -> $ty {
                self.$field
            }

            pub fn $setter(&mut self, value: $ty) -> bool {
                $crate::observable::set(&self.notifier, &mut self.$field, value, stringify!($field))
            }
        )*
    };
}

/// Getter/setter pairs for `String` fields.
macro_rules! str_props {
    ($($field:ident => $setter:ident;)*) => {
        $(
            pub fn $field(&self) -> &str {
                &self.$field
            }

            pub fn $setter(&mut self, value: impl Into<String>) -> bool {
                $crate::observable::set(&self.notifier, &mut self.$field, value.into(), stringify!($field))
            }
        )*
    };
}

pub(crate) use copy_props;
pub(crate) use str_props;

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(notifier: &Notifier) -> (Rc<RefCell<Vec<&'static str>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = notifier.subscribe(move |change| sink.borrow_mut().push(change.name));
        (seen, subscription)
    }

    #[test]
    fn set_skips_equal_values() {
        let notifier = Notifier::new();
        let (seen, _sub) = recorder(&notifier);
        let mut width = 16u32;

        assert!(!set(&notifier, &mut width, 16, "width"));
        assert!(set(&notifier, &mut width, 32, "width"));

        assert_eq!(width, 32);
        assert_eq!(*seen.borrow(), vec!["width"]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let notifier = Notifier::new();
        let (seen, sub) = recorder(&notifier);
        notifier.raise("a");
        drop(sub);
        notifier.raise("b");
        assert_eq!(*seen.borrow(), vec!["a"]);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn handler_may_unsubscribe_during_emission() {
        let notifier = Notifier::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));
        let slot_in = Rc::clone(&slot);
        let hits_in = Rc::clone(&hits);
        let sub = notifier.subscribe(move |_| {
            hits_in.set(hits_in.get() + 1);
            slot_in.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        notifier.raise("x");
        notifier.raise("x");
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn loading_session_defers_to_single_all_notification() {
        let session = Session::new();
        let notifier = Notifier::new();
        notifier.attach(&session);
        let (seen, _sub) = recorder(&notifier);

        let guard = session.begin_load();
        notifier.raise("width");
        notifier.raise("height");
        assert!(seen.borrow().is_empty());
        guard.finish();

        assert_eq!(*seen.borrow(), vec![ALL_PROPERTIES]);
    }

    #[test]
    fn handlers_of_end_of_load_notification_raise_live_changes() {
        let session = Session::new();
        let other = Rc::new(Notifier::new());
        let source = Notifier::new();
        other.attach(&session);
        source.attach(&session);
        let (other_seen, _other_sub) = recorder(&other);
        let (source_seen, _source_sub) = recorder(&source);
        let target = Rc::clone(&other);
        let _relay = source.subscribe(move |change| {
            if change.is_all() {
                target.raise("derived");
            }
        });

        let guard = session.begin_load();
        other.raise("width");
        source.raise("width");
        guard.finish();

        assert_eq!(*other_seen.borrow(), vec![ALL_PROPERTIES, "derived"]);
        assert_eq!(*source_seen.borrow(), vec![ALL_PROPERTIES]);
    }

    #[test]
    fn forwarded_end_of_load_notification_reaches_owner_once() {
        let session = Session::new();
        let owner = Notifier::new();
        let child = Notifier::new();
        owner.attach(&session);
        child.attach(&session);
        let _link = child.forward_to(&owner, "child");
        let (seen, _sub) = recorder(&owner);

        let guard = session.begin_load();
        owner.raise("width");
        child.raise("height");
        guard.finish();
        child.raise("height");

        assert_eq!(*seen.borrow(), vec![ALL_PROPERTIES, "child"]);
    }

    #[test]
    fn cloned_notifier_is_independent() {
        let notifier = Notifier::new();
        let (_seen, _sub) = recorder(&notifier);
        let copy = notifier.clone();
        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(copy.subscriber_count(), 0);
    }
}
