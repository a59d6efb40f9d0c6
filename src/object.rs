use crate::ast::{comma_separated, Block};
use crate::environment::Environment;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    String(String),
    Array(Vec<Object>),
    Function(Function),
    Builtin(Builtin),
    Error(String),
}

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

impl Object {
    // The words used inside error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "Integer",
            Object::Boolean(_) => "Boolean",
            Object::Null => "Null",
            Object::String(_) => "String",
            Object::Array(_) => "Array",
            Object::Function(_) => "Function",
            Object::Builtin(_) => "Builtin",
            Object::Error(_) => "Error",
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::String(value) => write!(f, "{}", value),
            Object::Array(elements) => {
                write!(f, "[")?;
                comma_separated(f, elements)?;
                write!(f, "]")
            }
            Object::Function(function) => write!(f, "{}", function),
            Object::Builtin(builtin) => write!(f, "{}", builtin),
            Object::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

// Control flow threaded through evaluation as the Err arm of EvalResult.
// `Return` is unwrapped at the enclosing call boundary (or the program top
// level); `Error` surfaces as an Error object at the public boundary. Neither
// escapes to users.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Return(Object),
    Error(String),
}

pub type EvalResult = Result<Object, Signal>;

// A user function: parameter names, body, and the environment captured at
// the definition site. Compared by handle identity, like any other scope.
#[derive(Clone)]
pub struct Function {
    data: Rc<FunctionImpl>,
}

struct FunctionImpl {
    parameters: Vec<String>,
    body: Block,
    env: Environment,
}

impl Function {
    pub fn new(parameters: Vec<String>, body: Block, env: Environment) -> Function {
        Function {
            data: Rc::new(FunctionImpl {
                parameters,
                body,
                env,
            }),
        }
    }
    pub fn parameters(&self) -> &[String] {
        &self.data.parameters
    }
    pub fn body(&self) -> &Block {
        &self.data.body
    }
    pub fn env(&self) -> &Environment {
        &self.data.env
    }
    pub fn arity(&self) -> usize {
        self.data.parameters.len()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        comma_separated(f, self.parameters())?;
        write!(f, ") {}", self.body())
    }
}

// The captured environment can reach this function again, so Debug leaves
// it out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.data.parameters)
            .field("body", &self.data.body)
            .finish()
    }
}

pub type BuiltinFn = fn(Vec<Object>) -> EvalResult;

#[derive(Clone, Copy, PartialEq)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

#[cfg(test)]
mod object_tests {
    use crate::ast::{Block, Expression, Statement};
    use crate::environment::Environment;
    use crate::object::{Function, Object, FALSE, NULL, TRUE};

    fn identity_fn() -> Function {
        Function::new(
            vec!["x".to_string()],
            Block {
                statements: vec![Statement::Expression(Expression::Identifier(
                    "x".to_string(),
                ))],
            },
            Environment::new(),
        )
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Object::Integer(5)), "5");
        assert_eq!(format!("{}", TRUE), "true");
        assert_eq!(format!("{}", FALSE), "false");
        assert_eq!(format!("{}", NULL), "null");
        assert_eq!(format!("{}", Object::String("hello".to_string())), "hello");
        assert_eq!(
            format!("{}", Object::Array(vec![Object::Integer(1), TRUE])),
            "[1, true]"
        );
        assert_eq!(
            format!("{}", Object::Error("boom".to_string())),
            "Error: boom"
        );
        assert_eq!(format!("{}", Object::Function(identity_fn())), "fn(x) { x }");
    }

    #[test]
    fn type_names() {
        assert_eq!(Object::Integer(0).type_name(), "Integer");
        assert_eq!(TRUE.type_name(), "Boolean");
        assert_eq!(NULL.type_name(), "Null");
        assert_eq!(Object::Array(Vec::new()).type_name(), "Array");
    }

    #[test]
    fn functions_compare_by_handle() {
        let f = identity_fn();
        assert_eq!(f.clone(), f);
        // Structurally identical, but a distinct definition.
        assert_ne!(identity_fn(), f);
    }
}
