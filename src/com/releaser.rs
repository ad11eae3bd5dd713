//! Scoped release of COM objects in reverse acquisition order.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::Deref;

use super::{ComInterface, ComPtr};
use crate::error::HrResult;
use crate::log_trace;

/// Owns COM references and releases them last-in, first-out.
///
/// Objects obtained from a parent should be added after the parent, so the
/// child is released first:
///
/// ```ignore
/// let mut rel = OleReleaser::new();
/// let items = rel.add(dialog.get_results()?);
/// let first = rel.add(items.get_item_at(0)?);
/// // ...
/// rel.release(); // first, then items
/// ```
#[derive(Default)]
pub struct OleReleaser {
    held: RefCell<Vec<ComPtr>>,
}

/// A borrowed view of an object owned by an [`OleReleaser`].
pub struct Held<'r, T: ComInterface> {
    obj: ManuallyDrop<T>,
    _owner: PhantomData<&'r OleReleaser>,
}

impl<T: ComInterface> Deref for Held<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.obj
    }
}

impl<T: ComInterface + std::fmt::Debug> std::fmt::Debug for Held<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Held").field(&*self.obj).finish()
    }
}

impl OleReleaser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `obj`. The same object may be added more than
    /// once; each addition owns one reference.
    pub fn add<T: ComInterface>(&self, obj: T) -> Held<'_, T> {
        let ptr = obj.into_com_ptr();
        let view = ManuallyDrop::new(T::from_com_ptr(ComPtr(ptr.0)));
        self.held.borrow_mut().push(ptr);
        Held { obj: view, _owner: PhantomData }
    }

    /// [`OleReleaser::add`] for the result of a COM call.
    pub fn add_result<T: ComInterface>(&self, obj: HrResult<T>) -> HrResult<Held<'_, T>> {
        obj.map(|o| self.add(o))
    }

    pub fn len(&self) -> usize {
        self.held.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.borrow().is_empty()
    }

    /// Releases everything, newest first. Calling it again does nothing.
    pub fn release(&mut self) {
        let held = std::mem::take(self.held.get_mut());
        if !held.is_empty() {
            log_trace!("releasing {} COM objects", held.len());
        }
        for ptr in held.into_iter().rev() {
            drop(ptr);
        }
    }

    /// Releases `objs` immediately and forgets them, so a later
    /// [`OleReleaser::release`] does not touch them again. Each view removes
    /// the most recent matching entry.
    ///
    /// # Panics
    /// Panics if `objs` is empty.
    pub fn release_now<'r, T: ComInterface>(&'r self, objs: impl IntoIterator<Item = Held<'r, T>>) {
        let (mut views, mut released) = (0usize, 0usize);
        for view in objs {
            views += 1;
            let raw = view.as_raw();
            let taken = {
                let mut held = self.held.borrow_mut();
                held.iter().rposition(|p| p.as_raw() == raw).map(|i| held.remove(i))
            };
            debug_assert!(taken.is_some(), "view {:p} is not held by this releaser", raw);
            if taken.is_some() {
                released += 1;
            }
            // Dropped outside the borrow: Release may run arbitrary code.
            drop(taken);
        }
        assert!(views > 0, "OleReleaser::release_now called with nothing to release");
        log_trace!("released {} COM objects early", released);
    }
}

impl Drop for OleReleaser {
    fn drop(&mut self) {
        self.release();
    }
}
