use crate::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A mutable leaf object stored by reference.
///
/// Plain copies of a dict share the cell; deep copies duplicate it.
pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Tracks cells already duplicated during a deep copy, keyed by the
/// address of the original cell.
///
/// Two references to one cell in the source become two references to one
/// cell in the copy, and a cell that reaches itself is copied once.
#[derive(Debug, Default)]
pub struct CopyMemo {
    cells: HashMap<usize, Shared<Value>>,
}

impl CopyMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, cell: &Shared<Value>) -> Option<Shared<Value>> {
        self.cells.get(&addr(cell)).cloned()
    }

    pub fn remember(&mut self, cell: &Shared<Value>, copy: Shared<Value>) {
        self.cells.insert(addr(cell), copy);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn addr(cell: &Shared<Value>) -> usize {
    Rc::as_ptr(cell) as usize
}

thread_local! {
    static VISITING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// Run `f` on the content of `cell` unless the current thread is already
/// inside `cell`, or the cell is mutably borrowed. Recursive walks over
/// values (printing, comparing, serializing) go through here so that a cell
/// reaching itself ends the walk instead of overflowing the stack.
pub(crate) fn visit<R>(cell: &Shared<Value>, f: impl FnOnce(&Value) -> R) -> Option<R> {
    let key = addr(cell);
    if !VISITING.with(|visiting| visiting.borrow_mut().insert(key)) {
        return None;
    }
    let result = cell.try_borrow().ok().map(|value| f(&value));
    VISITING.with(|visiting| visiting.borrow_mut().remove(&key));
    result
}
