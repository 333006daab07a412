//! The backing store's predicate grammar (spec §6.1): identifiers, string literals
//! (double-quoted, `\"` escape), unsigned integers, `=`/`<`/`<=`/`>`/`>=`/`~` (glob),
//! `&&`/`||`, parentheses. This module parses and evaluates it so the in-memory
//! reference store can answer `query_entities` the same way a real store would.

use std::collections::HashMap;

use golembase_core::err::{bail, DbError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Uint(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Glob,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare(String, Op, Literal),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

pub fn parse(input: &str) -> Result<Predicate> {
    let tokens = lex(input)?;
    let mut pos = 0;
    let pred = parse_or(&tokens, &mut pos)?;
    if pos != tokens.len() {
        bail!(DbError::operational(format!(
            "trailing tokens in predicate string: {input}"
        )));
    }
    Ok(pred)
}

pub fn eval(
    pred: &Predicate,
    string_annotations: &HashMap<String, String>,
    numeric_annotations: &HashMap<String, u64>,
) -> bool {
    match pred {
        Predicate::And(l, r) => {
            eval(l, string_annotations, numeric_annotations)
                && eval(r, string_annotations, numeric_annotations)
        }
        Predicate::Or(l, r) => {
            eval(l, string_annotations, numeric_annotations)
                || eval(r, string_annotations, numeric_annotations)
        }
        Predicate::Compare(field, op, lit) => match lit {
            Literal::Uint(n) => numeric_annotations
                .get(field)
                .map(|v| compare_num(*v, *op, *n))
                .unwrap_or(false),
            Literal::Str(s) => string_annotations
                .get(field)
                .map(|v| compare_str(v, *op, s))
                .unwrap_or(false),
        },
    }
}

fn compare_num(v: u64, op: Op, n: u64) -> bool {
    match op {
        Op::Eq => v == n,
        Op::Lt => v < n,
        Op::Le => v <= n,
        Op::Gt => v > n,
        Op::Ge => v >= n,
        Op::Glob => false,
    }
}

fn compare_str(v: &str, op: Op, s: &str) -> bool {
    match op {
        Op::Eq => v == s,
        Op::Lt => v < s,
        Op::Le => v <= s,
        Op::Gt => v > s,
        Op::Ge => v >= s,
        Op::Glob => glob_match(s, v),
    }
}

/// `*` any sequence, `?` any single char, `[set]` classes (spec §6.1).
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    glob_match_at(&p, &t)
}

fn glob_match_at(p: &[char], t: &[char]) -> bool {
    match p.first() {
        None => t.is_empty(),
        Some('*') => glob_match_at(&p[1..], t) || (!t.is_empty() && glob_match_at(p, &t[1..])),
        Some('?') => !t.is_empty() && glob_match_at(&p[1..], &t[1..]),
        Some('[') => {
            let Some(close) = p.iter().position(|&c| c == ']') else {
                return !t.is_empty() && p[0] == t[0] && glob_match_at(&p[1..], &t[1..]);
            };
            let set = &p[1..close];
            !t.is_empty() && set.contains(&t[0]) && glob_match_at(&p[close + 1..], &t[1..])
        }
        Some(c) => !t.is_empty() && *c == t[0] && glob_match_at(&p[1..], &t[1..]),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Uint(u64),
    Op(Op),
    And,
    Or,
    LParen,
    RParen,
}

fn lex(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = vec![];
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '=' => {
                tokens.push(Token::Op(Op::Eq));
                i += 1;
            }
            '~' => {
                tokens.push(Token::Op(Op::Glob));
                i += 1;
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Op(Op::Le));
                    i += 2;
                } else {
                    tokens.push(Token::Op(Op::Lt));
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Op(Op::Ge));
                    i += 2;
                } else {
                    tokens.push(Token::Op(Op::Gt));
                    i += 1;
                }
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '"' => {
                let mut s = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => bail!(DbError::operational("unterminated string literal in predicate")),
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some('\\') if chars.get(i + 1) == Some(&'"') => {
                            s.push('"');
                            i += 2;
                        }
                        Some(c) => {
                            s.push(*c);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Str(s));
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
                    i += 1;
                }
                let n: u64 = chars[start..i]
                    .iter()
                    .collect::<String>()
                    .parse()
                    .map_err(|_| DbError::operational("invalid integer literal in predicate"))?;
                tokens.push(Token::Uint(n));
            }
            c if c.is_alphanumeric() || c == '_' || c == '$' => {
                let start = i;
                while chars
                    .get(i)
                    .is_some_and(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
                {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => bail!(DbError::operational(format!(
                "unexpected character '{other}' in predicate"
            ))),
        }
    }
    Ok(tokens)
}

fn parse_or(tokens: &[Token], pos: &mut usize) -> Result<Predicate> {
    let mut left = parse_and(tokens, pos)?;
    while tokens.get(*pos) == Some(&Token::Or) {
        *pos += 1;
        let right = parse_and(tokens, pos)?;
        left = Predicate::Or(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_and(tokens: &[Token], pos: &mut usize) -> Result<Predicate> {
    let mut left = parse_atom(tokens, pos)?;
    while tokens.get(*pos) == Some(&Token::And) {
        *pos += 1;
        let right = parse_atom(tokens, pos)?;
        left = Predicate::And(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_atom(tokens: &[Token], pos: &mut usize) -> Result<Predicate> {
    if tokens.get(*pos) == Some(&Token::LParen) {
        *pos += 1;
        let inner = parse_or(tokens, pos)?;
        if tokens.get(*pos) != Some(&Token::RParen) {
            bail!(DbError::operational("expected ')' in predicate"));
        }
        *pos += 1;
        return Ok(inner);
    }
    let Some(Token::Ident(field)) = tokens.get(*pos) else {
        bail!(DbError::operational("expected identifier in predicate"));
    };
    let field = field.clone();
    *pos += 1;
    let Some(Token::Op(op)) = tokens.get(*pos) else {
        bail!(DbError::operational("expected comparison operator in predicate"));
    };
    let op = *op;
    *pos += 1;
    let lit = match tokens.get(*pos) {
        Some(Token::Str(s)) => Literal::Str(s.clone()),
        Some(Token::Uint(n)) => Literal::Uint(*n),
        _ => bail!(DbError::operational("expected literal in predicate")),
    };
    *pos += 1;
    Ok(Predicate::Compare(field, op, lit))
}
