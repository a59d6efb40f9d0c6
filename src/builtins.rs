use crate::object::{Builtin, EvalResult, Object, Signal};
use phf::phf_map;

static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "len" => Builtin { name: "len", func: len },
};

// Consulted only after the environment chain misses, so user bindings win.
pub fn lookup(name: &str) -> Option<Object> {
    BUILTINS.get(name).map(|builtin| Object::Builtin(*builtin))
}

// Builtins validate their own arguments. A native fault must never escape
// as anything other than a Signal::Error.
fn len(arguments: Vec<Object>) -> EvalResult {
    if arguments.len() != 1 {
        return Err(Signal::Error(format!(
            "wrong number of arguments. got {}, want 1",
            arguments.len()
        )));
    }
    match &arguments[0] {
        Object::String(value) => Ok(Object::Integer(value.chars().count() as i64)),
        other => Err(Signal::Error(format!(
            "argument type to `len` not supported, got {}",
            other.type_name()
        ))),
    }
}
