use std::cell::RefCell;
use std::rc::Rc;

/// Lifetime of a mounted component. Cleanups registered here run once, on
/// [`Scope::dispose`] or when the last handle is dropped.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                disposers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    pub fn pending_disposers(&self) -> usize {
        self.inner.disposers.borrow().len()
    }

    pub fn dispose(self) {
        self.inner.run_cleanups();
    }
}

impl ScopeInner {
    fn run_cleanups(&self) {
        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers {
            disposer();
        }
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.run_cleanups();
    }
}
