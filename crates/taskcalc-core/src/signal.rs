use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

/// Cloneable handle to an observable value.
///
/// Subscribers are notified after the write has been committed, with the
/// internal borrow released, so a subscriber may read (or write) the signal
/// it is subscribed to.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    next_sub: SubId,
    subs: Vec<(SubId, Rc<dyn Fn(&T)>)>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            next_sub: 0,
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    /// Reads the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, v: T)
    where
        T: Clone,
    {
        self.0.borrow_mut().value = v;
        self.notify();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F)
    where
        T: Clone,
    {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        let id = inner.next_sub;
        inner.next_sub += 1;
        inner.subs.push((id, Rc::new(f)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        let mut inner = self.0.borrow_mut();
        let before = inner.subs.len();
        inner.subs.retain(|(sid, _)| *sid != id);
        inner.subs.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subs.len()
    }

    /// True if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn notify(&self)
    where
        T: Clone,
    {
        let (snapshot, subs) = {
            let inner = self.0.borrow();
            if inner.subs.is_empty() {
                return;
            }
            let subs: Vec<Rc<dyn Fn(&T)>> = inner.subs.iter().map(|(_, s)| s.clone()).collect();
            (inner.value.clone(), subs)
        };
        for s in subs {
            s(&snapshot);
        }
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
