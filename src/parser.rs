use crate::ast::{Block, Expression, Program, Statement};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};
use std::mem;

#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
#[repr(u8)]
enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // add(x)
    Index,       // array[0]
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
    errors: Vec<String>,
}

struct ParseRule {
    prefix: Option<fn(&mut Parser) -> Option<Expression>>,
    infix: Option<fn(&mut Parser, Expression) -> Option<Expression>>,
    precedence: Precedence,
}

impl ParseRule {
    fn get_rule(tokentype: TokenType) -> &'static ParseRule {
        &RULES[(tokentype as u8) as usize]
    }
}

macro_rules! prefix_rule {
    (None) => {
        None
    };
    ($method:ident) => {
        Some(|p: &mut Parser| p.$method())
    };
}

macro_rules! infix_rule {
    (None) => {
        None
    };
    ($method:ident) => {
        Some(|p: &mut Parser, left: Expression| p.$method(left))
    };
}

macro_rules! mkrules {
    ($($prefix:tt, $infix:tt, $precedence:tt) ; +) => {
        &[
        $(
            ParseRule {
                prefix: prefix_rule!($prefix),
                infix: infix_rule!($infix),
                precedence: Precedence::$precedence
            }
        ),+
        ]
    };
}

// One row per TokenType, in declaration order.
#[rustfmt::skip]
static RULES: &[ParseRule] = mkrules!(
    grouping,         call,   Call;        // LeftParen
    None,             None,   Lowest;      // RightParen
    None,             None,   Lowest;      // LeftBrace
    None,             None,   Lowest;      // RightBrace
    array,            index,  Index;       // LeftBracket
    None,             None,   Lowest;      // RightBracket
    None,             None,   Lowest;      // Comma
    None,             None,   Lowest;      // Semicolon
    None,             infix,  Sum;         // Plus
    prefix,           infix,  Sum;         // Minus
    None,             infix,  Product;     // Star
    None,             infix,  Product;     // Slash
    None,             infix,  LessGreater; // Less
    None,             infix,  LessGreater; // Greater
    prefix,           None,   Lowest;      // Bang
    None,             infix,  Equals;      // BangEqual
    None,             None,   Lowest;      // Equal
    None,             infix,  Equals;      // EqualEqual
    identifier,       None,   Lowest;      // Identifier
    integer,          None,   Lowest;      // Integer
    string,           None,   Lowest;      // String
    function_literal, None,   Lowest;      // Fn
    None,             None,   Lowest;      // Let
    boolean,          None,   Lowest;      // True
    boolean,          None,   Lowest;      // False
    if_expression,    None,   Lowest;      // If
    None,             None,   Lowest;      // Else
    None,             None,   Lowest;      // Return
    None,             None,   Lowest;      // EOF
    None,             None,   Lowest      // Illegal
);

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Parser<'a> {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Parser {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    // Best effort: a malformed statement contributes a diagnostic and the
    // loop resynchronizes on the next statement boundary. Callers must check
    // errors() before trusting the result.
    pub fn parse(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_is(TokenType::EOF) {
            if let Some(statement) = self.statement() {
                statements.push(statement);
            }
            self.advance();
        }
        Program { statements }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn advance(&mut self) {
        self.cur = mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn cur_is(&self, tokentype: TokenType) -> bool {
        self.cur.tokentype == tokentype
    }

    fn peek_is(&self, tokentype: TokenType) -> bool {
        self.peek.tokentype == tokentype
    }

    // The expect-and-advance primitive behind every structured construct.
    fn expect_peek(&mut self, expected: TokenType) -> bool {
        if self.peek_is(expected) {
            self.advance();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {}, got {} instead",
                expected, self.peek.tokentype
            ));
            false
        }
    }

    fn statement(&mut self) -> Option<Statement> {
        match self.cur.tokentype {
            TokenType::Let => self.let_statement(),
            TokenType::Return => self.return_statement(),
            _ => self.expression_statement(),
        }
    }

    fn let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenType::Identifier) {
            return None;
        }
        let name = self.cur.literal.clone();
        if !self.expect_peek(TokenType::Equal) {
            return None;
        }
        self.advance();
        let value = self.expression(Precedence::Lowest)?;
        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }
        Some(Statement::Let { name, value })
    }

    fn return_statement(&mut self) -> Option<Statement> {
        self.advance();
        let value = self.expression(Precedence::Lowest)?;
        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }
        Some(Statement::Return { value })
    }

    fn expression_statement(&mut self) -> Option<Statement> {
        let expression = self.expression(Precedence::Lowest)?;
        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }
        Some(Statement::Expression(expression))
    }

    // Pratt core: the prefix handler for the current token yields the left
    // operand, then strictly higher-precedence infix handlers on the peek
    // token extend it. Strict `<` makes every binary operator
    // left-associative.
    fn expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = match ParseRule::get_rule(self.cur.tokentype).prefix {
            Some(prefix) => prefix,
            None => {
                self.errors.push(format!(
                    "no prefix parse function for {} found",
                    self.cur.tokentype
                ));
                return None;
            }
        };
        let mut left = prefix(self)?;
        while !self.peek_is(TokenType::Semicolon)
            && precedence < ParseRule::get_rule(self.peek.tokentype).precedence
        {
            let infix = match ParseRule::get_rule(self.peek.tokentype).infix {
                Some(infix) => infix,
                None => return Some(left),
            };
            self.advance();
            left = infix(self, left)?;
        }
        Some(left)
    }

    fn identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(self.cur.literal.clone()))
    }

    fn integer(&mut self) -> Option<Expression> {
        match self.cur.literal.parse() {
            Ok(value) => Some(Expression::Integer(value)),
            Err(_) => {
                self.errors
                    .push(format!("could not parse {:?} as integer", self.cur.literal));
                None
            }
        }
    }

    fn string(&mut self) -> Option<Expression> {
        Some(Expression::String(self.cur.literal.clone()))
    }

    fn boolean(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(self.cur_is(TokenType::True)))
    }

    fn prefix(&mut self) -> Option<Expression> {
        let operator = self.cur.tokentype;
        self.advance();
        let right = self.expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn infix(&mut self, left: Expression) -> Option<Expression> {
        let operator = self.cur.tokentype;
        let precedence = ParseRule::get_rule(operator).precedence;
        self.advance();
        let right = self.expression(precedence)?;
        Some(Expression::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn grouping(&mut self) -> Option<Expression> {
        self.advance();
        let expression = self.expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RightParen) {
            return None;
        }
        Some(expression)
    }

    fn if_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenType::LeftParen) {
            return None;
        }
        self.advance();
        let condition = self.expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RightParen) {
            return None;
        }
        if !self.expect_peek(TokenType::LeftBrace) {
            return None;
        }
        let consequence = self.block();
        let alternative = if self.peek_is(TokenType::Else) {
            self.advance();
            if !self.expect_peek(TokenType::LeftBrace) {
                return None;
            }
            Some(self.block())
        } else {
            None
        };
        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    // Called with cur on `{`; returns with cur on `}`, or on EOF when the
    // brace never closes.
    fn block(&mut self) -> Block {
        let mut statements = Vec::new();
        self.advance();
        while !self.cur_is(TokenType::RightBrace) && !self.cur_is(TokenType::EOF) {
            if let Some(statement) = self.statement() {
                statements.push(statement);
            }
            self.advance();
        }
        Block { statements }
    }

    fn function_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenType::LeftParen) {
            return None;
        }
        let parameters = self.parameters()?;
        if !self.expect_peek(TokenType::LeftBrace) {
            return None;
        }
        Some(Expression::Function {
            parameters,
            body: self.block(),
        })
    }

    fn parameters(&mut self) -> Option<Vec<String>> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenType::RightParen) {
            self.advance();
            return Some(parameters);
        }
        if !self.expect_peek(TokenType::Identifier) {
            return None;
        }
        parameters.push(self.cur.literal.clone());
        while self.peek_is(TokenType::Comma) {
            self.advance();
            if !self.expect_peek(TokenType::Identifier) {
                return None;
            }
            parameters.push(self.cur.literal.clone());
        }
        if !self.expect_peek(TokenType::RightParen) {
            return None;
        }
        Some(parameters)
    }

    fn call(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.expression_list(TokenType::RightParen)?;
        Some(Expression::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn array(&mut self) -> Option<Expression> {
        let elements = self.expression_list(TokenType::RightBracket)?;
        Some(Expression::Array(elements))
    }

    // Comma-separated expressions up to `end`; shared by call arguments and
    // array literals. Called with cur on the opening token.
    fn expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut items = Vec::new();
        if self.peek_is(end) {
            self.advance();
            return Some(items);
        }
        self.advance();
        items.push(self.expression(Precedence::Lowest)?);
        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.advance();
            items.push(self.expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(items)
    }

    fn index(&mut self, left: Expression) -> Option<Expression> {
        self.advance();
        let index = self.expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RightBracket) {
            return None;
        }
        Some(Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }
}

#[cfg(test)]
mod parser_tests {
    use crate::ast::{Block, Expression, Program, Statement};
    use crate::lexer::Lexer;
    use crate::parser::{Parser, RULES};
    use crate::token::TokenType;
    use std::convert::TryFrom;

    fn parse(input: &str) -> Program {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse();
        assert!(
            parser.errors().is_empty(),
            "unexpected errors for {:?}: {:?}",
            input,
            parser.errors()
        );
        program
    }

    fn parse_errors(input: &str) -> Vec<String> {
        let mut parser = Parser::new(Lexer::new(input));
        parser.parse();
        parser.errors().to_vec()
    }

    fn ident(name: &str) -> Expression {
        Expression::Identifier(name.to_string())
    }

    #[test]
    fn let_statements() {
        let program = parse("let x = 5; let y = true; let foobar = y;");
        assert_eq!(
            program.statements,
            vec![
                Statement::Let {
                    name: "x".to_string(),
                    value: Expression::Integer(5),
                },
                Statement::Let {
                    name: "y".to_string(),
                    value: Expression::Boolean(true),
                },
                Statement::Let {
                    name: "foobar".to_string(),
                    value: ident("y"),
                },
            ]
        );
    }

    #[test]
    fn return_statements() {
        let program = parse("return 5; return true; return foobar;");
        assert_eq!(
            program.statements,
            vec![
                Statement::Return {
                    value: Expression::Integer(5),
                },
                Statement::Return {
                    value: Expression::Boolean(true),
                },
                Statement::Return { value: ident("foobar") },
            ]
        );
    }

    #[test]
    fn literal_expressions() {
        assert_eq!(
            parse("foobar;").statements,
            vec![Statement::Expression(ident("foobar"))]
        );
        assert_eq!(
            parse("5;").statements,
            vec![Statement::Expression(Expression::Integer(5))]
        );
        assert_eq!(
            parse("true; false;").statements,
            vec![
                Statement::Expression(Expression::Boolean(true)),
                Statement::Expression(Expression::Boolean(false)),
            ]
        );
        assert_eq!(
            parse("\"hello world\";").statements,
            vec![Statement::Expression(Expression::String(
                "hello world".to_string()
            ))]
        );
    }

    #[test]
    fn prefix_expressions() {
        let cases = [
            ("!5;", TokenType::Bang, Expression::Integer(5)),
            ("-15;", TokenType::Minus, Expression::Integer(15)),
            ("!true;", TokenType::Bang, Expression::Boolean(true)),
            ("!false;", TokenType::Bang, Expression::Boolean(false)),
        ];
        for (input, operator, right) in &cases {
            assert_eq!(
                parse(input).statements,
                vec![Statement::Expression(Expression::Prefix {
                    operator: *operator,
                    right: Box::new(right.clone()),
                })],
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn infix_expressions() {
        let cases = [
            ("5 + 5;", TokenType::Plus),
            ("5 - 5;", TokenType::Minus),
            ("5 * 5;", TokenType::Star),
            ("5 / 5;", TokenType::Slash),
            ("5 > 5;", TokenType::Greater),
            ("5 < 5;", TokenType::Less),
            ("5 == 5;", TokenType::EqualEqual),
            ("5 != 5;", TokenType::BangEqual),
        ];
        for (input, operator) in &cases {
            assert_eq!(
                parse(input).statements,
                vec![Statement::Expression(Expression::Infix {
                    operator: *operator,
                    left: Box::new(Expression::Integer(5)),
                    right: Box::new(Expression::Integer(5)),
                })],
                "{:?}",
                input
            );
        }
        assert_eq!(
            parse("true != false;").statements,
            vec![Statement::Expression(Expression::Infix {
                operator: TokenType::BangEqual,
                left: Box::new(Expression::Boolean(true)),
                right: Box::new(Expression::Boolean(false)),
            })]
        );
    }

    #[test]
    fn operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4) ((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];
        for (input, expected) in &cases {
            assert_eq!(format!("{}", parse(input)), *expected, "{:?}", input);
        }
    }

    #[test]
    fn if_expressions() {
        assert_eq!(
            parse("if (x < y) { x }").statements,
            vec![Statement::Expression(Expression::If {
                condition: Box::new(Expression::Infix {
                    operator: TokenType::Less,
                    left: Box::new(ident("x")),
                    right: Box::new(ident("y")),
                }),
                consequence: Block {
                    statements: vec![Statement::Expression(ident("x"))],
                },
                alternative: None,
            })]
        );
        assert_eq!(
            parse("if (x < y) { x } else { y }").statements,
            vec![Statement::Expression(Expression::If {
                condition: Box::new(Expression::Infix {
                    operator: TokenType::Less,
                    left: Box::new(ident("x")),
                    right: Box::new(ident("y")),
                }),
                consequence: Block {
                    statements: vec![Statement::Expression(ident("x"))],
                },
                alternative: Some(Block {
                    statements: vec![Statement::Expression(ident("y"))],
                }),
            })]
        );
    }

    #[test]
    fn function_literals() {
        assert_eq!(
            parse("fn(x, y) { x + y; }").statements,
            vec![Statement::Expression(Expression::Function {
                parameters: vec!["x".to_string(), "y".to_string()],
                body: Block {
                    statements: vec![Statement::Expression(Expression::Infix {
                        operator: TokenType::Plus,
                        left: Box::new(ident("x")),
                        right: Box::new(ident("y")),
                    })],
                },
            })]
        );

        let cases = [
            ("fn() {};", Vec::new()),
            ("fn(x) {};", vec!["x".to_string()]),
            (
                "fn(x, y, z) {};",
                vec!["x".to_string(), "y".to_string(), "z".to_string()],
            ),
        ];
        for (input, expected) in &cases {
            match &parse(input).statements[0] {
                Statement::Expression(Expression::Function { parameters, .. }) => {
                    assert_eq!(parameters, expected, "{:?}", input)
                }
                other => panic!("expected a function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn call_expressions() {
        assert_eq!(
            parse("add(1, 2 * 3, 4 + 5);").statements,
            vec![Statement::Expression(Expression::Call {
                function: Box::new(ident("add")),
                arguments: vec![
                    Expression::Integer(1),
                    Expression::Infix {
                        operator: TokenType::Star,
                        left: Box::new(Expression::Integer(2)),
                        right: Box::new(Expression::Integer(3)),
                    },
                    Expression::Infix {
                        operator: TokenType::Plus,
                        left: Box::new(Expression::Integer(4)),
                        right: Box::new(Expression::Integer(5)),
                    },
                ],
            })]
        );
    }

    #[test]
    fn array_literals_and_indexing() {
        assert_eq!(
            parse("[1, 2 * 2, 3 + 3]").statements,
            vec![Statement::Expression(Expression::Array(vec![
                Expression::Integer(1),
                Expression::Infix {
                    operator: TokenType::Star,
                    left: Box::new(Expression::Integer(2)),
                    right: Box::new(Expression::Integer(2)),
                },
                Expression::Infix {
                    operator: TokenType::Plus,
                    left: Box::new(Expression::Integer(3)),
                    right: Box::new(Expression::Integer(3)),
                },
            ]))]
        );
        assert_eq!(
            parse("[]").statements,
            vec![Statement::Expression(Expression::Array(Vec::new()))]
        );
        assert_eq!(
            parse("myArray[1 + 1]").statements,
            vec![Statement::Expression(Expression::Index {
                left: Box::new(ident("myArray")),
                index: Box::new(Expression::Infix {
                    operator: TokenType::Plus,
                    left: Box::new(Expression::Integer(1)),
                    right: Box::new(Expression::Integer(1)),
                }),
            })]
        );
    }

    #[test]
    fn diagnostics_accumulate_without_aborting() {
        assert_eq!(
            parse_errors("let x 5; let = 10; let 838383;"),
            vec![
                "expected next token to be =, got INT instead",
                "expected next token to be IDENT, got = instead",
                "no prefix parse function for = found",
                "expected next token to be IDENT, got INT instead",
            ]
        );
    }

    #[test]
    fn unparsable_integers_are_diagnosed() {
        assert_eq!(
            parse_errors("let x = 9999999999999999999999;"),
            vec!["could not parse \"9999999999999999999999\" as integer"]
        );
    }

    #[test]
    fn illegal_tokens_are_diagnosed() {
        assert_eq!(
            parse_errors("5 @ 5;"),
            vec!["no prefix parse function for ILLEGAL found"]
        );
    }

    #[test]
    fn unterminated_blocks_stop_at_eof() {
        let mut parser = Parser::new(Lexer::new("if (x) { 1"));
        let program = parser.parse();
        assert_eq!(program.statements.len(), 1);
        assert_eq!(format!("{}", program), "if (x) { 1 }");
    }

    #[test]
    fn rule_table_rows_align_with_token_kinds() {
        for i in 0..RULES.len() {
            assert!(
                TokenType::try_from(i as u8).is_ok(),
                "rule row {} has no token kind",
                i
            );
        }
        assert!(TokenType::try_from(RULES.len() as u8).is_err());
    }

    #[test]
    fn rendering_round_trips() {
        let inputs = [
            "let foo = bar;",
            "let x = 5;",
            "return 5 + 5;",
            "if (x < y) { x } else { y }",
            "fn(x, y) { x + y }",
            "let f = fn(a) { if (a) { return 1; } else { return 2; } };",
            "[1, \"two\", [3]]",
            "arr[1 + 1]",
            "add(1)(2)",
            "let s = \"hi there\";",
            "foo bar",
        ];
        for input in &inputs {
            let first = parse(input);
            let rendered = format!("{}", first);
            let second = parse(&rendered);
            assert_eq!(first, second, "{:?} re-parsed from {:?}", input, rendered);
        }
        assert_eq!(format!("{}", parse("let foo = bar;")), "let foo = bar;");
    }
}
