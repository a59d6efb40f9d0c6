use crate::object::Object;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

// A scope, shared by handle: every closure that captured it and every call
// frame chained beneath it observes mutations made through any other handle.
// The outer chain is acyclic and points toward enclosing lexical scope.
#[derive(Clone)]
pub struct Environment {
    data: Rc<RefCell<EnvironmentImpl>>,
}

struct EnvironmentImpl {
    values: BTreeMap<String, Object>,
    outer: Option<Environment>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            data: Rc::new(RefCell::new(EnvironmentImpl {
                values: BTreeMap::new(),
                outer: None,
            })),
        }
    }
    pub fn new_child(&self) -> Environment {
        Environment {
            data: Rc::new(RefCell::new(EnvironmentImpl {
                values: BTreeMap::new(),
                outer: Some(self.clone()),
            })),
        }
    }
    pub fn get(&self, name: &str) -> Option<Object> {
        let data = self.data.borrow();
        match data.values.get(name) {
            Some(value) => Some(value.clone()),
            None => data.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }
    // Binds in this scope. The language has no assignment operator, so
    // nothing ever writes through to an outer scope.
    pub fn set(&self, name: &str, value: Object) {
        self.data
            .borrow_mut()
            .values
            .insert(name.to_string(), value);
    }
    pub fn equals(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

// A closure's environment can reach the closure again, so Debug prints
// binding names only.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Environment")
            .field("names", &data.values.keys().collect::<Vec<_>>())
            .field("enclosed", &data.outer.is_some())
            .finish()
    }
}
