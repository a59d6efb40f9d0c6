use crate::ast::{Block, Expression, Program, Statement};
use crate::builtins;
use crate::environment::Environment;
use crate::object::{EvalResult, Function, Object, Signal, FALSE, NULL, TRUE};
use crate::token::TokenType;

// Runs a whole program, absorbing both signal kinds: a top-level `return`
// yields its value and a runtime failure surfaces as an Error object.
pub fn evaluate(program: &Program, env: &Environment) -> Object {
    match eval_program(program, env) {
        Ok(object) => object,
        Err(Signal::Return(value)) => value,
        Err(Signal::Error(message)) => Object::Error(message),
    }
}

fn eval_program(program: &Program, env: &Environment) -> EvalResult {
    let mut result = NULL;
    for statement in &program.statements {
        result = eval_statement(statement, env)?;
    }
    Ok(result)
}

fn eval_block(block: &Block, env: &Environment) -> EvalResult {
    let mut result = NULL;
    for statement in &block.statements {
        result = eval_statement(statement, env)?;
    }
    Ok(result)
}

fn eval_statement(statement: &Statement, env: &Environment) -> EvalResult {
    match statement {
        Statement::Let { name, value } => {
            let value = eval_expression(value, env)?;
            env.set(name, value);
            Ok(NULL)
        }
        Statement::Return { value } => {
            let value = eval_expression(value, env)?;
            Err(Signal::Return(value))
        }
        Statement::Expression(expression) => eval_expression(expression, env),
    }
}

fn eval_expression(expression: &Expression, env: &Environment) -> EvalResult {
    match expression {
        Expression::Identifier(name) => eval_identifier(name, env),
        Expression::Integer(value) => Ok(Object::Integer(*value)),
        Expression::Boolean(value) => Ok(if *value { TRUE } else { FALSE }),
        Expression::String(value) => Ok(Object::String(value.clone())),
        Expression::Array(elements) => Ok(Object::Array(eval_expressions(elements, env)?)),
        Expression::Prefix { operator, right } => {
            let right = eval_expression(right, env)?;
            eval_prefix(*operator, right)
        }
        Expression::Infix {
            operator,
            left,
            right,
        } => {
            let left = eval_expression(left, env)?;
            let right = eval_expression(right, env)?;
            eval_infix(*operator, left, right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, env)?;
            if is_truthy(&condition) {
                eval_block(consequence, env)
            } else {
                match alternative {
                    Some(block) => eval_block(block, env),
                    None => Ok(NULL),
                }
            }
        }
        Expression::Function { parameters, body } => Ok(Object::Function(Function::new(
            parameters.clone(),
            body.clone(),
            env.clone(),
        ))),
        Expression::Call {
            function,
            arguments,
        } => {
            let function = eval_expression(function, env)?;
            let arguments = eval_expressions(arguments, env)?;
            apply_function(function, arguments)
        }
        Expression::Index { left, index } => {
            let left = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            eval_index(left, index)
        }
    }
}

// Left to right, in the caller's environment.
fn eval_expressions(expressions: &[Expression], env: &Environment) -> Result<Vec<Object>, Signal> {
    let mut results = Vec::with_capacity(expressions.len());
    for expression in expressions {
        results.push(eval_expression(expression, env)?);
    }
    Ok(results)
}

fn eval_identifier(name: &str, env: &Environment) -> EvalResult {
    if let Some(value) = env.get(name) {
        return Ok(value);
    }
    // User bindings shadow builtins.
    if let Some(builtin) = builtins::lookup(name) {
        return Ok(builtin);
    }
    Err(Signal::Error(format!("identifier not found: {}", name)))
}

// Null and false are falsy; everything else, including 0, is truthy.
fn is_truthy(object: &Object) -> bool {
    match object {
        Object::Null => false,
        Object::Boolean(value) => *value,
        _ => true,
    }
}

fn eval_prefix(operator: TokenType, right: Object) -> EvalResult {
    match operator {
        TokenType::Bang => Ok(if is_truthy(&right) { FALSE } else { TRUE }),
        TokenType::Minus => match right {
            Object::Integer(value) => Ok(Object::Integer(value.wrapping_neg())),
            other => Err(Signal::Error(format!(
                "unknown operation: -{}",
                other.type_name()
            ))),
        },
        other => Err(Signal::Error(format!(
            "unknown operation: {}{}",
            other,
            right.type_name()
        ))),
    }
}

fn eval_infix(operator: TokenType, left: Object, right: Object) -> EvalResult {
    match (left, right) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix(operator, left, right)
        }
        (Object::Boolean(left), Object::Boolean(right)) => match operator {
            TokenType::EqualEqual => Ok(Object::Boolean(left == right)),
            TokenType::BangEqual => Ok(Object::Boolean(left != right)),
            other => Err(Signal::Error(format!(
                "unknown operation: Boolean {} Boolean",
                other
            ))),
        },
        (left, right) => {
            let message = if left.type_name() != right.type_name() {
                format!(
                    "type mismatch: {} {} {}",
                    left.type_name(),
                    operator,
                    right.type_name()
                )
            } else {
                format!(
                    "unknown operation: {} {} {}",
                    left.type_name(),
                    operator,
                    right.type_name()
                )
            };
            Err(Signal::Error(message))
        }
    }
}

fn eval_integer_infix(operator: TokenType, left: i64, right: i64) -> EvalResult {
    match operator {
        TokenType::Plus => Ok(Object::Integer(left.wrapping_add(right))),
        TokenType::Minus => Ok(Object::Integer(left.wrapping_sub(right))),
        TokenType::Star => Ok(Object::Integer(left.wrapping_mul(right))),
        TokenType::Slash => {
            if right == 0 {
                Err(Signal::Error("division by zero".to_string()))
            } else {
                Ok(Object::Integer(left.wrapping_div(right)))
            }
        }
        TokenType::Less => Ok(Object::Boolean(left < right)),
        TokenType::Greater => Ok(Object::Boolean(left > right)),
        TokenType::EqualEqual => Ok(Object::Boolean(left == right)),
        TokenType::BangEqual => Ok(Object::Boolean(left != right)),
        other => Err(Signal::Error(format!(
            "unknown operation: Integer {} Integer",
            other
        ))),
    }
}

fn apply_function(function: Object, arguments: Vec<Object>) -> EvalResult {
    match function {
        Object::Function(function) => {
            if arguments.len() != function.arity() {
                return Err(Signal::Error(format!(
                    "wrong number of arguments. got {}, want {}",
                    arguments.len(),
                    function.arity()
                )));
            }
            // The call scope extends the environment captured at the
            // definition site, not the caller's.
            let env = function.env().new_child();
            for (parameter, argument) in function.parameters().iter().zip(arguments) {
                env.set(parameter, argument);
            }
            match eval_block(function.body(), &env) {
                // A return travels no further than the call boundary.
                Err(Signal::Return(value)) => Ok(value),
                result => result,
            }
        }
        Object::Builtin(builtin) => (builtin.func)(arguments),
        other => Err(Signal::Error(format!(
            "not a function: {}",
            other.type_name()
        ))),
    }
}

fn eval_index(left: Object, index: Object) -> EvalResult {
    match (left, index) {
        (Object::Array(elements), Object::Integer(index)) => {
            if index < 0 || index as usize >= elements.len() {
                Ok(NULL)
            } else {
                Ok(elements[index as usize].clone())
            }
        }
        (left, _) => Err(Signal::Error(format!(
            "index operation not supported: {}",
            left.type_name()
        ))),
    }
}
