//! Ordered, mutation-observable sequences.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use crate::observable::{
    Listeners, Observable, ObservableCollection, PropertyChanged, PropertyHandler, Subscription,
};
use crate::error::{ModelError, Result};
use crate::session::Session;

/// Kind of structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Add,
    Remove,
    Replace,
    Move,
    /// The whole collection changed; re-read it.
    Reset,
}

/// A structural change and the items it affected.
///
/// For `Add`, `Replace` and `Move` the items are the ones now at `index`;
/// for `Remove` they are the items that were removed from `index`. A
/// `Reset` carries no items.
#[derive(Debug)]
pub struct CollectionChanged<'a, T> {
    pub action: ChangeAction,
    pub index: usize,
    pub items: &'a [T],
}

type ChangeHandler<T> = dyn Fn(&CollectionChanged<'_, T>);

/// Ordered container raising structural notifications and relaying the
/// change notifications of its elements.
pub struct Seq<T> {
    items: Vec<T>,
    links: Vec<Subscription>,
    changes: Rc<Listeners<ChangeHandler<T>>>,
    item_changes: Rc<Listeners<PropertyHandler>>,
    session: RefCell<Option<Session>>,
    reset_epoch: Cell<Option<u64>>,
}

impl<T: Observable + 'static> Seq<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            links: Vec::new(),
            changes: Listeners::new(),
            item_changes: Listeners::new(),
            session: RefCell::new(None),
            reset_epoch: Cell::new(None),
        }
    }

    pub fn push(&mut self, item: T) {
        let index = self.items.len();
        self.insert(index, item);
    }

    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, item: T) {
        let link = self.link(&item);
        self.items.insert(index, item);
        self.links.insert(index, link);
        self.notify(ChangeAction::Add, index, 1);
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.links.remove(index);
        self.notify_removed(index, &item);
        item
    }

    /// Replace the element at `index`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace(&mut self, index: usize, item: T) -> T {
        self.links[index] = self.link(&item);
        let old = std::mem::replace(&mut self.items[index], item);
        self.notify(ChangeAction::Replace, index, 1);
        old
    }

    /// Move the element at `from` so that it ends up at `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let item = self.items.remove(from);
        let link = self.links.remove(from);
        self.items.insert(to, item);
        self.links.insert(to, link);
        self.notify(ChangeAction::Move, to, 1);
    }

    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.links.clear();
        self.items.clear();
        self.notify(ChangeAction::Reset, 0, 0);
    }

    pub fn truncate(&mut self, len: usize) {
        while self.items.len() > len {
            self.remove_at(self.items.len() - 1);
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn subscribe(&self, handler: impl Fn(&CollectionChanged<'_, T>) + 'static) -> Subscription {
        self.changes.add(Rc::new(handler))
    }

    /// Subscribe to change notifications raised by any element.
    pub fn subscribe_items(&self, handler: impl Fn(&PropertyChanged) + 'static) -> Subscription {
        self.item_changes.add(Rc::new(handler))
    }

    /// Bind the collection and its current elements to a session.
    pub fn attach(&self, session: &Session) {
        *self.session.borrow_mut() = Some(session.clone());
        for item in &self.items {
            item.attach(session);
        }
    }

    fn link(&self, item: &T) -> Subscription {
        if let Some(session) = self.session.borrow().as_ref() {
            item.attach(session);
        }
        let relay = Rc::downgrade(&self.item_changes);
        item.notifier().subscribe(move |change| {
            if let Some(relay) = relay.upgrade() {
                for handler in relay.snapshot() {
                    handler(change);
                }
            }
        })
    }

    fn loading_session(&self) -> Option<Session> {
        self.session
            .borrow()
            .as_ref()
            .filter(|session| session.is_loading())
            .cloned()
    }

    /// While loading, structural changes collapse into one deferred reset.
    fn defer_reset(&self, session: &Session) {
        let epoch = session.epoch();
        if self.reset_epoch.replace(Some(epoch)) == Some(epoch) {
            return;
        }
        let changes = Rc::downgrade(&self.changes);
        session.defer(Box::new(move |session: &Session| {
            if let Some(changes) = changes.upgrade() {
                let event = CollectionChanged {
                    action: ChangeAction::Reset,
                    index: 0,
                    items: &[],
                };
                session.replay(|| broadcast(&changes, &event));
            }
        }));
    }

    fn notify(&self, action: ChangeAction, index: usize, count: usize) {
        if let Some(session) = self.loading_session() {
            self.defer_reset(&session);
            return;
        }
        let items = match action {
            ChangeAction::Reset => &[][..],
            _ => &self.items[index..index + count],
        };
        self.emit(&CollectionChanged {
            action,
            index,
            items,
        });
    }

    fn notify_removed(&self, index: usize, item: &T) {
        if let Some(session) = self.loading_session() {
            self.defer_reset(&session);
            return;
        }
        self.emit(&CollectionChanged {
            action: ChangeAction::Remove,
            index,
            items: std::slice::from_ref(item),
        });
    }

    fn emit(&self, event: &CollectionChanged<'_, T>) {
        let session = self.session.borrow().clone();
        match session {
            Some(session) => session.live(|| broadcast(&self.changes, event)),
            None => broadcast(&self.changes, event),
        }
    }
}

fn broadcast<T: 'static>(changes: &Listeners<ChangeHandler<T>>, event: &CollectionChanged<'_, T>) {
    for handler in changes.snapshot() {
        handler(event);
    }
}

impl<T> Seq<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }
}

/// An entity keyed by an identifier that is unique within its collection.
pub trait Identified {
    fn identifier(&self) -> &str;
}

impl<T: Identified> Seq<T> {
    pub fn find(&self, identifier: &str) -> Option<&T> {
        self.items.iter().find(|item| item.identifier() == identifier)
    }

    pub fn find_mut(&mut self, identifier: &str) -> Option<&mut T> {
        self.items
            .iter_mut()
            .find(|item| item.identifier() == identifier)
    }

    /// Fail if an element already uses `identifier`.
    pub fn ensure_vacant(&self, identifier: &str) -> Result<()> {
        match self.find(identifier) {
            Some(_) => Err(ModelError::DuplicateIdentifier(identifier.to_string())),
            None => Ok(()),
        }
    }

    /// Look up the element called `from` and hand it to `rename` once `to`
    /// is known to be free.
    pub(crate) fn rename_with(
        &mut self,
        from: &str,
        to: &str,
        rename: impl FnOnce(&mut T) -> Result<bool>,
    ) -> Result<bool> {
        if to.is_empty() {
            return Err(ModelError::EmptyIdentifier);
        }
        if from != to {
            self.ensure_vacant(to)?;
        }
        let item = self
            .find_mut(from)
            .ok_or_else(|| ModelError::UnknownIdentifier(from.to_string()))?;
        rename(item)
    }
}

impl<T: Identified + Observable + 'static> Seq<T> {
    /// Append `item` unless its identifier is already taken.
    pub fn push_unique(&mut self, item: T) -> Result<()> {
        self.ensure_vacant(item.identifier())?;
        self.push(item);
        Ok(())
    }
}

impl<T: Observable + 'static> Default for Seq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Observable + 'static> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        for item in iter {
            seq.push(item);
        }
        seq
    }
}

impl<T> Index<usize> for Seq<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a Seq<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq for Seq<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: fmt::Debug> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: Observable + 'static> ObservableCollection for Seq<T> {
    fn watch_structure(&self, handler: impl Fn(ChangeAction) + 'static) -> Subscription {
        self.subscribe(move |change| handler(change.action))
    }

    fn watch_items(&self, handler: impl Fn(&PropertyChanged) + 'static) -> Subscription {
        self.subscribe_items(handler)
    }

    fn attach_session(&self, session: &Session) {
        self.attach(session);
    }
}
