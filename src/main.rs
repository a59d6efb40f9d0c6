use clap::{crate_version, App, Arg};
use mist::environment::Environment;
use mist::evaluator;
use mist::lexer::Lexer;
use mist::object::Object;
use mist::parser::Parser;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

fn main() {
    let matches = App::new("mist")
        .version(crate_version!())
        .about("The Mist programming language")
        .arg(
            Arg::with_name("script")
                .help("Source file to run; omit for an interactive session")
                .index(1),
        )
        .get_matches();

    match matches.value_of("script") {
        Some(path) => run_file(path),
        None => run_prompt(),
    }
}

fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("could not read {}: {}", path, err);
            process::exit(66);
        }
    };
    let mut parser = Parser::new(Lexer::new(&source));
    let program = parser.parse();
    if !parser.errors().is_empty() {
        report_parse_errors(parser.errors());
        process::exit(65);
    }
    match evaluator::evaluate(&program, &Environment::new()) {
        error @ Object::Error(_) => {
            eprintln!("{}", error);
            process::exit(70);
        }
        Object::Null => {}
        result => println!("{}", result),
    }
}

// One environment for the whole session; each line gets a fresh parser.
fn run_prompt() {
    let user = env::var("USER").unwrap_or_else(|_| String::from("there"));
    println!("Hello {}! This is the Mist programming language!", user);
    println!("Feel free to type in commands!");
    let env = Environment::new();
    loop {
        print!(">> ");
        io::stdout().flush().unwrap();
        let mut line = String::new();
        let bytes = io::stdin()
            .read_line(&mut line)
            .expect("failed to read line");
        if bytes == 0 {
            break;
        }
        let mut parser = Parser::new(Lexer::new(&line));
        let program = parser.parse();
        if !parser.errors().is_empty() {
            report_parse_errors(parser.errors());
            continue;
        }
        println!("{}", evaluator::evaluate(&program, &env));
    }
}

fn report_parse_errors(errors: &[String]) {
    eprintln!("parse errors:");
    for error in errors {
        eprintln!("\t{}", error);
    }
}
