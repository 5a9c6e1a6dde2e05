use std::collections::HashMap;
use std::rc::Rc;

use tinyproc_core::ast::Function;

/// One call frame. Frames do not see each other's variables or functions.
#[derive(Debug, Default)]
pub struct Context {
    args: Vec<i64>,
    variables: HashMap<Rc<str>, i64>,
    functions: HashMap<Rc<str>, Rc<Function>>,
    child: Option<Box<Context>>,
    depth: usize,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn args(&self) -> &[i64] {
        &self.args
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn variable(&self, name: &str) -> Option<i64> {
        self.variables.get(name).copied()
    }

    /// Returns the variable's value, creating it as 0 first if needed.
    pub fn declare(&mut self, name: &Rc<str>) -> i64 {
        *self.variables.entry(name.clone()).or_insert(0)
    }

    pub fn set(&mut self, name: Rc<str>, value: i64) {
        self.variables.insert(name, value);
    }

    pub fn function(&self, name: &str) -> Option<Rc<Function>> {
        self.functions.get(name).cloned()
    }

    pub fn define_function(&mut self, function: Rc<Function>) {
        self.functions
            .insert(function.prototype.name.name.clone(), function);
    }

    pub fn child(&self) -> Option<&Context> {
        self.child.as_deref()
    }
}

/// Owns the caller's child slot for the duration of a call and empties it
/// when dropped, on every exit path.
pub struct CallGuard<'a> {
    slot: &'a mut Option<Box<Context>>,
    depth: usize,
}

impl<'a> CallGuard<'a> {
    pub fn enter(caller: &'a mut Context) -> Self {
        Self {
            depth: caller.depth + 1,
            slot: &mut caller.child,
        }
    }

    /// Links a fresh frame holding `args` as the caller's child.
    pub fn attach(&mut self, args: Vec<i64>) -> &mut Context {
        let frame = Context {
            args,
            depth: self.depth,
            ..Context::default()
        };
        &mut **self.slot.insert(Box::new(frame))
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        *self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_is_idempotent() {
        let mut context = Context::new();
        let name: Rc<str> = "x".into();

        assert_eq!(context.declare(&name), 0);
        context.set(name.clone(), 7);
        assert_eq!(context.declare(&name), 7);
        assert_eq!(context.variable("x"), Some(7));
    }

    #[test]
    fn test_call_guard_detaches_child() {
        let mut caller = Context::new();
        {
            let mut guard = CallGuard::enter(&mut caller);
            let frame = guard.attach(vec![1, 2]);
            assert_eq!(frame.args(), &[1, 2]);
            assert_eq!(frame.depth(), 1);
            frame.set("local".into(), 3);
        }

        assert!(caller.child().is_none());
        assert_eq!(caller.variable("local"), None);
    }
}
