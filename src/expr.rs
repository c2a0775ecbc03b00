//! # Arithmetic Expressions
//!
//! Infix source such as `sqrt(a^2 + b^2) / 2` is split into [`Token`]s
//! and arranged into an [`Expr`] tree with the shunting-yard algorithm.
//! Operator nodes own their operands as children, function nodes own their
//! arguments, in source order. Parentheses and commas only steer parsing
//! and never appear in the tree.
//!
//! Trees render back to infix with the fewest parentheses that keep their
//! meaning, which is what the equation element paints.

use std::collections::HashMap;
use std::fmt;

use crate::error::InputError;
use crate::pdf::content::fmt_num;

/// How operators of equal precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// Prefix minus.
    Neg,
}

impl Operator {
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
            Operator::Neg => 3,
            Operator::Pow => 4,
        }
    }

    pub fn assoc(&self) -> Assoc {
        match self {
            Operator::Pow | Operator::Neg => Assoc::Right,
            _ => Assoc::Left,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Operator::Neg => 1,
            _ => 2,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub | Operator::Neg => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }

    /// Typeset symbol; `×` and `÷` are both in WinAnsi.
    fn display_symbol(&self) -> char {
        match self {
            Operator::Mul => '\u{d7}',
            Operator::Div => '\u{f7}',
            other => other.symbol(),
        }
    }

    fn apply(&self, args: &[f64]) -> f64 {
        match (self, args) {
            (Operator::Neg, [a]) => -a,
            (Operator::Add, [a, b]) => a + b,
            (Operator::Sub, [a, b]) => a - b,
            (Operator::Mul, [a, b]) => a * b,
            (Operator::Div, [a, b]) => a / b,
            (Operator::Pow, [a, b]) => a.powf(*b),
            _ => f64::NAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Variable(String),
    Operator(Operator),
    Function(String),
    LeftParen,
    RightParen,
    Comma,
}

/// A token with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Accepted argument counts of the built-in functions.
fn function_arity(name: &str) -> Option<(usize, usize)> {
    match name {
        "sqrt" | "sin" | "cos" | "tan" | "ln" | "exp" | "abs" => Some((1, 1)),
        "log" => Some((1, 2)),
        "min" | "max" => Some((1, usize::MAX)),
        _ => None,
    }
}

fn syntax(offset: usize, message: impl fmt::Display) -> InputError {
    InputError::Expression(format!("{message} at offset {offset}"))
}

/// Split `source` into tokens.
///
/// `+` and `-` are prefix operators at the start of the input and after an
/// operator, `(` or `,`; a prefix `+` is dropped. An identifier directly
/// followed by `(` is a function name.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, InputError> {
    let mut out: Vec<Spanned> = Vec::new();
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let expects_operand = matches!(
            out.last().map(|s| &s.token),
            None | Some(Token::Operator(_)) | Some(Token::LeftParen) | Some(Token::Comma)
        );

        if c.is_ascii_digit() || c == '.' {
            while i < chars.len() && (chars[i].1.is_ascii_digit() || chars[i].1 == '.') {
                i += 1;
            }
            let end = chars.get(i).map_or(source.len(), |(o, _)| *o);
            let text = &source[offset..end];
            let value: f64 = text
                .parse()
                .map_err(|_| syntax(offset, format!("malformed number {text:?}")))?;
            out.push(Spanned {
                token: Token::Number(value),
                offset,
            });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_') {
                i += 1;
            }
            let end = chars.get(i).map_or(source.len(), |(o, _)| *o);
            let name = source[offset..end].to_string();
            let next = chars[i..].iter().find(|(_, c)| !c.is_whitespace());
            let token = if matches!(next, Some((_, '('))) {
                if function_arity(&name).is_none() {
                    return Err(syntax(offset, format!("unknown function {name:?}")));
                }
                Token::Function(name)
            } else {
                Token::Variable(name)
            };
            out.push(Spanned { token, offset });
            continue;
        }

        let token = match c {
            '+' if expects_operand => None,
            '-' if expects_operand => Some(Token::Operator(Operator::Neg)),
            '+' => Some(Token::Operator(Operator::Add)),
            '-' => Some(Token::Operator(Operator::Sub)),
            '*' | '\u{d7}' => Some(Token::Operator(Operator::Mul)),
            '/' | '\u{f7}' => Some(Token::Operator(Operator::Div)),
            '^' => Some(Token::Operator(Operator::Pow)),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            ',' => Some(Token::Comma),
            other => return Err(syntax(offset, format!("unexpected character {other:?}"))),
        };
        if let Some(token) = token {
            out.push(Spanned { token, offset });
        }
        i += 1;
    }
    Ok(out)
}

/// One node of a parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub token: Token,
    pub children: Vec<Expr>,
}

/// Operator-stack entry of the shunting-yard parser.
#[derive(Debug)]
enum Pending {
    Operator(Operator, usize),
    Function(String, usize),
    LeftParen(usize),
}

#[derive(Debug, Default)]
struct Parser {
    output: Vec<Expr>,
    stack: Vec<Pending>,
    /// Argument counts of the open function calls.
    args: Vec<usize>,
}

impl Parser {
    /// Pop `op`'s operands from the output and push the combined node.
    fn reduce(&mut self, op: Operator, offset: usize) -> Result<(), InputError> {
        let arity = op.arity();
        if self.output.len() < arity {
            return Err(syntax(offset, format!("operator '{}' is missing an operand", op.symbol())));
        }
        let children = self.output.split_off(self.output.len() - arity);
        self.output.push(Expr {
            token: Token::Operator(op),
            children,
        });
        Ok(())
    }

    /// Reduce operators until the innermost open parenthesis.
    fn unwind_to_paren(&mut self, offset: usize) -> Result<usize, InputError> {
        loop {
            match self.stack.pop() {
                Some(Pending::Operator(op, at)) => self.reduce(op, at)?,
                Some(Pending::LeftParen(at)) => return Ok(at),
                Some(Pending::Function(_, at)) => {
                    return Err(syntax(at, "function call without arguments"))
                }
                None => return Err(syntax(offset, "unbalanced ')' or ','")),
            }
        }
    }

    fn push_operator(&mut self, op: Operator, offset: usize) -> Result<(), InputError> {
        if op.arity() == 2 {
            while let Some(Pending::Operator(top, at)) = self.stack.last() {
                let (top, at) = (*top, *at);
                let binds_tighter = top.precedence() > op.precedence()
                    || (top.precedence() == op.precedence() && op.assoc() == Assoc::Left);
                if !binds_tighter {
                    break;
                }
                self.stack.pop();
                self.reduce(top, at)?;
            }
        }
        self.stack.push(Pending::Operator(op, offset));
        Ok(())
    }

    fn close_call(&mut self, name: String, offset: usize) -> Result<(), InputError> {
        let count = self.args.pop().unwrap_or(0);
        let (min, max) = function_arity(&name).unwrap_or((0, 0));
        if count < min || count > max {
            return Err(syntax(
                offset,
                format!("{name} takes {} arguments, got {count}", arity_text(min, max)),
            ));
        }
        if self.output.len() < count {
            return Err(InputError::Expression(format!(
                "internal: {name} lost its arguments"
            )));
        }
        let children = self.output.split_off(self.output.len() - count);
        self.output.push(Expr {
            token: Token::Function(name),
            children,
        });
        Ok(())
    }
}

fn arity_text(min: usize, max: usize) -> String {
    if min == max {
        min.to_string()
    } else if max == usize::MAX {
        format!("at least {min}")
    } else {
        format!("{min} to {max}")
    }
}

impl Expr {
    /// Parse infix `source` into a tree.
    pub fn parse(source: &str) -> Result<Expr, InputError> {
        let tokens = tokenize(source)?;
        let mut p = Parser::default();
        let mut prev: Option<&Token> = None;

        for Spanned { token, offset } in &tokens {
            let offset = *offset;
            let operand_before = matches!(
                prev,
                Some(Token::Number(_)) | Some(Token::Variable(_)) | Some(Token::RightParen)
            );
            match token {
                Token::Number(_) | Token::Variable(_) => {
                    if operand_before {
                        return Err(syntax(offset, "missing operator"));
                    }
                    p.output.push(Expr {
                        token: token.clone(),
                        children: Vec::new(),
                    });
                }
                Token::Function(name) => {
                    if operand_before {
                        return Err(syntax(offset, "missing operator"));
                    }
                    p.stack.push(Pending::Function(name.clone(), offset));
                }
                Token::LeftParen => {
                    if operand_before {
                        return Err(syntax(offset, "missing operator"));
                    }
                    if matches!(prev, Some(Token::Function(_))) {
                        p.args.push(1);
                    }
                    p.stack.push(Pending::LeftParen(offset));
                }
                Token::Comma => {
                    if !operand_before {
                        return Err(syntax(offset, "missing argument"));
                    }
                    p.unwind_to_paren(offset)?;
                    if !matches!(p.stack.last(), Some(Pending::Function(..))) {
                        return Err(syntax(offset, "',' outside a function call"));
                    }
                    if let Some(n) = p.args.last_mut() {
                        *n += 1;
                    }
                    // The paren stays open for the next argument.
                    p.stack.push(Pending::LeftParen(offset));
                }
                Token::RightParen => {
                    let empty_call = matches!(prev, Some(Token::LeftParen));
                    if !operand_before && !empty_call {
                        return Err(syntax(offset, "missing operand before ')'"));
                    }
                    p.unwind_to_paren(offset)?;
                    if let Some(Pending::Function(..)) = p.stack.last() {
                        if let Some(Pending::Function(name, at)) = p.stack.pop() {
                            if empty_call {
                                if let Some(n) = p.args.last_mut() {
                                    *n = 0;
                                }
                            }
                            p.close_call(name, at)?;
                        }
                    } else if empty_call {
                        return Err(syntax(offset, "empty parentheses"));
                    }
                }
                Token::Operator(op) => {
                    if op.arity() == 2 && !operand_before {
                        return Err(syntax(offset, format!("operator '{}' is missing an operand", op.symbol())));
                    }
                    if op.arity() == 1 && operand_before {
                        return Err(syntax(offset, "missing operator"));
                    }
                    p.push_operator(*op, offset)?;
                }
            }
            prev = Some(token);
        }

        let end = source.len();
        while let Some(pending) = p.stack.pop() {
            match pending {
                Pending::Operator(op, at) => p.reduce(op, at)?,
                Pending::LeftParen(at) | Pending::Function(_, at) => {
                    return Err(syntax(at, "unclosed '('"))
                }
            }
        }
        match p.output.len() {
            1 => p.output.pop().ok_or_else(|| syntax(end, "empty expression")),
            0 => Err(syntax(end, "empty expression")),
            _ => Err(syntax(end, "missing operator")),
        }
    }

    /// Variable names in first-use order, without repeats.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Token::Variable(name) = &self.token {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
        }
        for child in &self.children {
            child.collect_variables(out);
        }
    }

    /// Evaluate with the given variable bindings.
    pub fn evaluate(&self, vars: &HashMap<String, f64>) -> Result<f64, InputError> {
        let args = self
            .children
            .iter()
            .map(|c| c.evaluate(vars))
            .collect::<Result<Vec<f64>, _>>()?;
        let value = match &self.token {
            Token::Number(v) => *v,
            Token::Variable(name) => *vars
                .get(name)
                .ok_or_else(|| InputError::Expression(format!("unbound variable {name:?}")))?,
            Token::Operator(op) => op.apply(&args),
            Token::Function(name) => call(name, &args)?,
            other => {
                return Err(InputError::Expression(format!(
                    "internal: {other:?} left in a parsed tree"
                )))
            }
        };
        if !value.is_finite() {
            return Err(InputError::NonFinite {
                what: "expression value",
            });
        }
        Ok(value)
    }

    /// Infix text with `×` and `÷` for multiplication and division.
    pub fn typeset(&self) -> String {
        let mut out = String::new();
        self.write_infix(&mut out, true);
        out
    }

    fn write_infix(&self, out: &mut String, pretty: bool) {
        match &self.token {
            Token::Number(v) => out.push_str(&fmt_num(*v)),
            Token::Variable(name) => out.push_str(name),
            Token::Function(name) => {
                out.push_str(name);
                out.push('(');
                for (i, arg) in self.children.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.write_infix(out, pretty);
                }
                out.push(')');
            }
            Token::Operator(op) => {
                let symbol = if pretty { op.display_symbol() } else { op.symbol() };
                match self.children.as_slice() {
                    [operand] => {
                        out.push(symbol);
                        operand.write_operand(out, pretty, op.precedence(), false);
                    }
                    [lhs, rhs] => {
                        lhs.write_operand(out, pretty, op.precedence(), op.assoc() == Assoc::Right);
                        out.push(' ');
                        out.push(symbol);
                        out.push(' ');
                        rhs.write_operand(out, pretty, op.precedence(), op.assoc() == Assoc::Left);
                    }
                    _ => {}
                }
            }
            Token::LeftParen | Token::RightParen | Token::Comma => {}
        }
    }

    /// Write as an operand of an operator of precedence `parent`; `strict`
    /// also wraps equal precedence, on the side where grouping differs.
    fn write_operand(&self, out: &mut String, pretty: bool, parent: u8, strict: bool) {
        let wrap = match &self.token {
            Token::Operator(op) if op.arity() == 2 => {
                op.precedence() < parent || (strict && op.precedence() == parent)
            }
            Token::Operator(op) => op.precedence() < parent,
            Token::Number(v) => *v < 0.0,
            _ => false,
        };
        if wrap {
            out.push('(');
        }
        self.write_infix(out, pretty);
        if wrap {
            out.push(')');
        }
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, InputError> {
    Ok(match (name, args) {
        ("sqrt", [x]) => x.sqrt(),
        ("sin", [x]) => x.sin(),
        ("cos", [x]) => x.cos(),
        ("tan", [x]) => x.tan(),
        ("ln", [x]) => x.ln(),
        ("exp", [x]) => x.exp(),
        ("abs", [x]) => x.abs(),
        ("log", [x]) => x.log10(),
        ("log", [base, x]) => x.log(*base),
        ("min", xs) if !xs.is_empty() => xs.iter().copied().fold(f64::INFINITY, f64::min),
        ("max", xs) if !xs.is_empty() => xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        _ => {
            return Err(InputError::Expression(format!(
                "{name} cannot take {} arguments",
                args.len()
            )))
        }
    })
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_infix(&mut out, false);
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str) -> f64 {
        Expr::parse(src).unwrap().evaluate(&HashMap::new()).unwrap()
    }

    fn leaf(token: Token) -> Expr {
        Expr {
            token,
            children: Vec::new(),
        }
    }

    #[test]
    fn tokenizes_prefix_minus_and_functions() {
        let tokens: Vec<Token> = tokenize("-x * max(1, 2)")
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect();
        assert_eq!(
            tokens,
            [
                Token::Operator(Operator::Neg),
                Token::Variable("x".into()),
                Token::Operator(Operator::Mul),
                Token::Function("max".into()),
                Token::LeftParen,
                Token::Number(1.0),
                Token::Comma,
                Token::Number(2.0),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn tree_follows_precedence() {
        let e = Expr::parse("a + b * c").unwrap();
        assert_eq!(e.token, Token::Operator(Operator::Add));
        assert_eq!(e.children[0], leaf(Token::Variable("a".into())));
        assert_eq!(e.children[1].token, Token::Operator(Operator::Mul));
        assert_eq!(e.variables(), ["a", "b", "c"]);
    }

    #[test]
    fn evaluates_with_precedence_and_associativity() {
        assert_eq!(eval("1 + 2 * 3"), 7.0);
        assert_eq!(eval("(1 + 2) * 3"), 9.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("2 ^ 3 ^ 2"), 512.0);
        assert_eq!(eval("-2 ^ 2"), -4.0);
        assert_eq!(eval("2 ^ -1"), 0.5);
        assert_eq!(eval("+3"), 3.0);
        assert_eq!(eval("max(1, 7, 3) - min(4, 2)"), 5.0);
        assert!((eval("log(2, 8)") - 3.0).abs() < 1e-12);
    }

    #[test]
    fn binds_variables() {
        let e = Expr::parse("sqrt(a^2 + b^2)").unwrap();
        let vars = HashMap::from([("a".to_string(), 3.0), ("b".to_string(), 4.0)]);
        assert_eq!(e.evaluate(&vars).unwrap(), 5.0);
        assert!(e.evaluate(&HashMap::new()).is_err());
    }

    #[test]
    fn renders_minimal_parentheses() {
        let show = |s: &str| Expr::parse(s).unwrap().to_string();
        assert_eq!(show("(1 + 2) * 3"), "(1 + 2) * 3");
        assert_eq!(show("((1 - 2)) - 3"), "1 - 2 - 3");
        assert_eq!(show("1 - (2 - 3)"), "1 - (2 - 3)");
        assert_eq!(show("(2 ^ 3) ^ 2"), "(2 ^ 3) ^ 2");
        assert_eq!(show("-(a + b)"), "-(a + b)");
        assert_eq!(show("max(a,b*2)"), "max(a, b * 2)");
        assert_eq!(Expr::parse("a*b/c").unwrap().typeset(), "a \u{d7} b \u{f7} c");
    }

    #[test]
    fn rejects_malformed_input() {
        for src in ["", "1 +", "(1", "1)", "1 2", "1 $ 2", "f(1)", "sin(1, 2)", "max()", "()", "1,2", "* 3"] {
            let err = Expr::parse(src).unwrap_err();
            assert!(
                matches!(err, InputError::Expression(_)),
                "{src:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn non_finite_results_are_errors() {
        let e = Expr::parse("1 / 0").unwrap();
        assert!(matches!(
            e.evaluate(&HashMap::new()),
            Err(InputError::NonFinite { .. })
        ));
    }
}
