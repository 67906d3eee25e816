use std::cell::RefCell;
use std::rc::Rc;

/// Cleanup guard. Clones share the same cleanup, which runs at most once
/// whichever clone runs it first.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_spent(&self) -> bool {
        self.0.borrow().is_none()
    }
}
