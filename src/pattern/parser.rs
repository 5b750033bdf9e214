// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Recursive descent parser for numeric pattern strings.
//!
//! Parses patterns like `^5 [0%:10%]{1:3} >=10%` into a [`CompiledPattern`]
//! that can be executed by the engine in [`crate::pattern::executor`].
//!
//! Quantifiers are postfix, so they are applied retroactively: every atom
//! records the block-list length before it was emitted, and a following
//! quantifier moves the blocks emitted since then into a new
//! [`Limiter`] at the same position.

use crate::common::numeric::Numeric;
use crate::pattern::block::{
    Block, Bound, Checker, CompareOp, CompiledPattern, FunctionCall, FunctionRef, GroupMarker,
    Interval, Limiter, PercentRange,
};
use crate::pattern::error::CompileError;
use crate::pattern::lexer::{Lexer, Token, TokenKind};

/// Parses a pattern string into a [`CompiledPattern`].
///
/// # Errors
///
/// Returns a lexical [`CompileError`] for unrecognised characters or
/// malformed numbers, and a syntax [`CompileError`] for grammar violations,
/// unbalanced groups, literals not representable as `T`, and empty patterns.
///
/// # Examples
///
/// ```
/// use numeric_regex::pattern::parser::compile;
///
/// let pattern = compile::<f64>("5 [0%:10%]+").unwrap();
/// assert_eq!(pattern.blocks.len(), 2);
/// ```
pub fn compile<T: Numeric>(pattern: &str) -> Result<CompiledPattern<T>, CompileError> {
    let compiled = Parser::new(pattern)?.parse()?;
    log_debug!(
        "compiled pattern {:?}: {} blocks, anchors ^={} $={}, {} function(s)",
        pattern,
        compiled.block_count(),
        compiled.start_anchor,
        compiled.end_anchor,
        compiled.functions.len()
    );
    Ok(compiled)
}

struct Parser<'a, T> {
    lexer: Lexer<'a>,
    token: Token,
    blocks: Vec<Block<T>>,
    /// Block-list lengths at each currently open `(`.
    group_starts: Vec<usize>,
    functions: Vec<FunctionRef>,
    start_anchor: bool,
    end_anchor: bool,
}

impl<'a, T: Numeric> Parser<'a, T> {
    fn new(input: &'a str) -> Result<Self, CompileError> {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token()?;
        Ok(Self {
            lexer,
            token,
            blocks: Vec::new(),
            group_starts: Vec::new(),
            functions: Vec::new(),
            start_anchor: false,
            end_anchor: false,
        })
    }

    fn parse(mut self) -> Result<CompiledPattern<T>, CompileError> {
        if self.token.kind == TokenKind::StartAnchor {
            self.start_anchor = true;
            self.advance()?;
        }

        self.parse_commands()?;

        if !self.group_starts.is_empty() {
            return Err(CompileError::syntax("unclosed group", self.token.offset));
        }
        if self.blocks.is_empty() {
            return Err(CompileError::syntax("empty pattern", self.token.offset));
        }

        Ok(CompiledPattern {
            blocks: self.blocks,
            start_anchor: self.start_anchor,
            end_anchor: self.end_anchor,
            functions: self.functions,
        })
    }

    fn parse_commands(&mut self) -> Result<(), CompileError> {
        loop {
            let at = self.blocks.len();
            match self.token.kind {
                TokenKind::Number | TokenKind::Integer => {
                    let value = self.literal()?;
                    self.advance()?;
                    self.blocks.push(Block::Literal(value));
                    self.parse_limiter(at)?;
                }
                TokenKind::OpenInterval => {
                    let interval = self.parse_interval()?;
                    self.blocks.push(Block::Interval(interval));
                    self.parse_limiter(at)?;
                }
                TokenKind::OpenParen => {
                    self.group_starts.push(at);
                    self.blocks.push(Block::Group(GroupMarker::Open));
                    self.advance()?;
                }
                TokenKind::CloseParen => {
                    let Some(start) = self.group_starts.pop() else {
                        return Err(CompileError::syntax(
                            "unmatched ')'",
                            self.token.offset,
                        ));
                    };
                    self.blocks.push(Block::Group(GroupMarker::Close));
                    self.advance()?;
                    self.parse_limiter(start)?;
                }
                TokenKind::GreaterThan | TokenKind::LessThan | TokenKind::Equals => {
                    let checker = self.parse_checker()?;
                    self.blocks.push(Block::Checker(checker));
                    self.parse_limiter(at)?;
                }
                TokenKind::EndAnchor => {
                    self.end_anchor = true;
                    self.advance()?;
                    if self.token.kind != TokenKind::Eof {
                        return Err(self.unexpected("end of pattern after '$'"));
                    }
                    return Ok(());
                }
                TokenKind::Eof => return Ok(()),
                kind => {
                    return Err(CompileError::syntax(
                        format!("unexpected token {kind}"),
                        self.token.offset,
                    ))
                }
            }
        }
    }

    /// `'[' Bound ':' Bound (';' Name Literal*)? ']'`
    fn parse_interval(&mut self) -> Result<Interval<T>, CompileError> {
        self.expect(TokenKind::OpenInterval)?;
        let lower = self.parse_bound()?;
        self.expect(TokenKind::Colon)?;
        let upper = self.parse_bound()?;

        let mut function = None;
        if self.token.kind == TokenKind::Semicolon {
            self.advance()?;
            if self.token.kind != TokenKind::Function {
                return Err(self.unexpected("function name"));
            }
            let name = std::mem::take(&mut self.token.lexeme);
            self.advance()?;

            let mut params = Vec::new();
            while matches!(self.token.kind, TokenKind::Number | TokenKind::Integer) {
                params.push(self.literal()?);
                self.advance()?;
            }
            self.functions.push(FunctionRef {
                name: name.clone(),
                arity: params.len(),
            });
            function = Some(FunctionCall { name, params });
        }

        self.expect(TokenKind::CloseInterval)?;
        Ok(Interval {
            lower,
            upper,
            function,
        })
    }

    /// `('=' | '>' | '>=' | '<' | '<=') Bound`
    fn parse_checker(&mut self) -> Result<Checker<T>, CompileError> {
        let mut op = match self.token.kind {
            TokenKind::GreaterThan => CompareOp::Gt,
            TokenKind::LessThan => CompareOp::Lt,
            _ => CompareOp::Eq,
        };
        self.advance()?;
        if op != CompareOp::Eq && self.token.kind == TokenKind::Equals {
            op = if op == CompareOp::Gt {
                CompareOp::Gte
            } else {
                CompareOp::Lte
            };
            self.advance()?;
        }
        let threshold = self.parse_bound()?;
        Ok(Checker { op, threshold })
    }

    /// Number, integer or percentage, consumed.
    fn parse_bound(&mut self) -> Result<Bound<T>, CompileError> {
        let bound = match self.token.kind {
            TokenKind::Number | TokenKind::Integer => Bound::Value(self.literal()?),
            TokenKind::Percent => Bound::Percent(self.percent()?),
            _ => return Err(self.unexpected("number or percentage")),
        };
        self.advance()?;
        Ok(bound)
    }

    /// Wraps every block emitted since `at` into a limiter if a quantifier
    /// follows; otherwise leaves the block list untouched.
    fn parse_limiter(&mut self, at: usize) -> Result<(), CompileError> {
        let (min, max, percent) = match self.token.kind {
            TokenKind::Asterisk => {
                self.advance()?;
                (0, None, None)
            }
            TokenKind::Plus => {
                self.advance()?;
                (1, None, None)
            }
            TokenKind::Question => {
                self.advance()?;
                (0, Some(1), None)
            }
            TokenKind::OpenLimiter => self.parse_braces()?,
            _ => return Ok(()),
        };

        let blocks = self.blocks.split_off(at);
        debug_assert!(!blocks.is_empty(), "quantifier with nothing to repeat");
        self.blocks.push(Block::Limiter(Limiter {
            blocks,
            min,
            max,
            percent,
        }));
        Ok(())
    }

    /// `'{' NumRange '}' | '{' PctRange (';' NumRange)? '}'`
    fn parse_braces(
        &mut self,
    ) -> Result<(usize, Option<usize>, Option<PercentRange>), CompileError> {
        self.expect(TokenKind::OpenLimiter)?;
        match self.token.kind {
            TokenKind::Integer => {
                let (min, max) = self.parse_count_range()?;
                self.expect(TokenKind::CloseLimiter)?;
                Ok((min, Some(max), None))
            }
            TokenKind::Percent => {
                let range = self.parse_percent_range()?;
                let (min, max) = if self.token.kind == TokenKind::Semicolon {
                    self.advance()?;
                    let (min, max) = self.parse_count_range()?;
                    (min, Some(max))
                } else {
                    (0, None)
                };
                self.expect(TokenKind::CloseLimiter)?;
                Ok((min, max, Some(range)))
            }
            _ => Err(self.unexpected("integer or percentage")),
        }
    }

    /// `n` or `n:m`. A single count is exact.
    fn parse_count_range(&mut self) -> Result<(usize, usize), CompileError> {
        let min = self.count()?;
        self.advance()?;
        if self.token.kind != TokenKind::Colon {
            return Ok((min, min));
        }
        self.advance()?;
        let offset = self.token.offset;
        let max = self.count()?;
        self.advance()?;
        if max < min {
            return Err(CompileError::syntax(
                format!("maximum repeat count {max} is less than minimum {min}"),
                offset,
            ));
        }
        Ok((min, max))
    }

    /// `p%` or `p%:q%`. A single percentage bounds the run between no
    /// change and `p%`.
    fn parse_percent_range(&mut self) -> Result<PercentRange, CompileError> {
        let first = self.percent()?;
        self.advance()?;
        if self.token.kind != TokenKind::Colon {
            return Ok(PercentRange {
                lower: first.min(0.0),
                upper: first.max(0.0),
            });
        }
        self.advance()?;
        if self.token.kind != TokenKind::Percent {
            return Err(self.unexpected("percentage"));
        }
        let offset = self.token.offset;
        let second = self.percent()?;
        self.advance()?;
        if second < first {
            return Err(CompileError::syntax(
                "upper percentage is less than lower percentage",
                offset,
            ));
        }
        Ok(PercentRange {
            lower: first,
            upper: second,
        })
    }

    /// Current `Number`/`Integer` token as `T`; does not advance.
    fn literal(&self) -> Result<T, CompileError> {
        T::parse_literal(&self.token.lexeme).ok_or_else(|| {
            CompileError::syntax(
                format!(
                    "literal '{}' is not representable as the element type",
                    self.token.lexeme
                ),
                self.token.offset,
            )
        })
    }

    /// Current `Percent` token as a ratio; does not advance.
    fn percent(&self) -> Result<f64, CompileError> {
        self.token
            .lexeme
            .parse::<f64>()
            .map(|p| p / 100.0)
            .map_err(|_| {
                CompileError::syntax(
                    format!("invalid percentage '{}%'", self.token.lexeme),
                    self.token.offset,
                )
            })
    }

    /// Current `Integer` token as a repeat count; does not advance.
    fn count(&self) -> Result<usize, CompileError> {
        if self.token.kind != TokenKind::Integer {
            return Err(self.unexpected("integer"));
        }
        self.token.lexeme.parse::<usize>().map_err(|_| {
            CompileError::syntax(
                format!(
                    "repeat count '{}' must be a non-negative integer",
                    self.token.lexeme
                ),
                self.token.offset,
            )
        })
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), CompileError> {
        if self.token.kind == kind {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::syntax(
            format!("expected {expected}, got {}", self.describe_token()),
            self.token.offset,
        )
    }

    fn describe_token(&self) -> String {
        match self.token.kind {
            TokenKind::Number | TokenKind::Integer | TokenKind::Function => {
                format!("{} '{}'", self.token.kind, self.token.lexeme)
            }
            TokenKind::Percent => format!("percentage '{}%'", self.token.lexeme),
            kind => kind.to_string(),
        }
    }

    fn advance(&mut self) -> Result<(), CompileError> {
        self.token = self.lexer.next_token()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::error::CompileErrorKind;

    fn parse(input: &str) -> CompiledPattern<f64> {
        compile::<f64>(input).unwrap()
    }

    fn parse_err(input: &str) -> CompileError {
        compile::<f64>(input).unwrap_err()
    }

    fn limiter(block: &Block<f64>) -> &Limiter<f64> {
        match block {
            Block::Limiter(l) => l,
            other => panic!("expected limiter, got {other:?}"),
        }
    }

    #[test]
    fn test_literals() {
        let p = parse("1 2.5 -3");
        assert_eq!(
            p.blocks,
            vec![
                Block::Literal(1.0),
                Block::Literal(2.5),
                Block::Literal(-3.0)
            ]
        );
        assert!(!p.start_anchor);
        assert!(!p.end_anchor);
        assert!(p.functions.is_empty());
    }

    #[test]
    fn test_anchors() {
        let p = parse("^5$");
        assert!(p.start_anchor);
        assert!(p.end_anchor);
        assert_eq!(p.blocks, vec![Block::Literal(5.0)]);
    }

    #[test]
    fn test_interval_absolute_and_percent() {
        let p = parse("[1:10%]");
        assert_eq!(
            p.blocks,
            vec![Block::Interval(Interval {
                lower: Bound::Value(1.0),
                upper: Bound::Percent(0.1),
                function: None,
            })]
        );
    }

    #[test]
    fn test_interval_with_function() {
        let p = parse("[0:100;cmavgasc 3 0.5]");
        let Block::Interval(interval) = &p.blocks[0] else {
            panic!("expected interval");
        };
        assert_eq!(
            interval.function,
            Some(FunctionCall {
                name: "cmavgasc".to_string(),
                params: vec![3.0, 0.5],
            })
        );
        assert_eq!(
            p.functions,
            vec![FunctionRef {
                name: "cmavgasc".to_string(),
                arity: 2,
            }]
        );
    }

    #[test]
    fn test_star_plus_question() {
        let p = parse("1* 2+ 3?");
        let star = limiter(&p.blocks[0]);
        assert_eq!((star.min, star.max), (0, None));
        let plus = limiter(&p.blocks[1]);
        assert_eq!((plus.min, plus.max), (1, None));
        let question = limiter(&p.blocks[2]);
        assert_eq!((question.min, question.max), (0, Some(1)));
        assert_eq!(question.blocks, vec![Block::Literal(3.0)]);
    }

    #[test]
    fn test_brace_counts() {
        let p = parse("5{3} 6{2:4}");
        let exact = limiter(&p.blocks[0]);
        assert_eq!((exact.min, exact.max), (3, Some(3)));
        let range = limiter(&p.blocks[1]);
        assert_eq!((range.min, range.max), (2, Some(4)));
    }

    #[test]
    fn test_brace_percent() {
        let p = parse("[0:1000]{-5%:10%}");
        let l = limiter(&p.blocks[0]);
        assert_eq!(
            l.percent,
            Some(PercentRange {
                lower: -0.05,
                upper: 0.1
            })
        );
        assert_eq!((l.min, l.max), (0, None));
    }

    #[test]
    fn test_brace_single_percent_bounds_from_zero() {
        let up = parse("[0:1000]{10%}");
        assert_eq!(
            limiter(&up.blocks[0]).percent,
            Some(PercentRange {
                lower: 0.0,
                upper: 0.1
            })
        );
        let down = parse("[0:1000]{-10%}");
        assert_eq!(
            limiter(&down.blocks[0]).percent,
            Some(PercentRange {
                lower: -0.1,
                upper: 0.0
            })
        );
    }

    #[test]
    fn test_brace_percent_with_counts() {
        let p = parse("[0:1000]{0%:20%;2:5}");
        let l = limiter(&p.blocks[0]);
        assert_eq!((l.min, l.max), (2, Some(5)));
        assert!(l.percent.is_some());
    }

    #[test]
    fn test_quantifier_wraps_only_last_atom() {
        let p = parse("1 2 3+");
        assert_eq!(p.blocks.len(), 3);
        assert_eq!(p.blocks[0], Block::Literal(1.0));
        assert_eq!(p.blocks[1], Block::Literal(2.0));
        assert_eq!(limiter(&p.blocks[2]).blocks, vec![Block::Literal(3.0)]);
    }

    #[test]
    fn test_quantifier_wraps_whole_group() {
        let p = parse("0 (1 2)+");
        assert_eq!(p.blocks.len(), 2);
        let l = limiter(&p.blocks[1]);
        assert!(l.is_capturing());
        assert_eq!(
            l.blocks,
            vec![
                Block::Group(GroupMarker::Open),
                Block::Literal(1.0),
                Block::Literal(2.0),
                Block::Group(GroupMarker::Close),
            ]
        );
    }

    #[test]
    fn test_nested_groups() {
        let p = parse("((1 2)* 3)+");
        assert_eq!(p.blocks.len(), 1);
        let outer = limiter(&p.blocks[0]);
        assert_eq!(outer.blocks.len(), 4);
        assert_eq!(outer.blocks[0], Block::Group(GroupMarker::Open));
        let inner = limiter(&outer.blocks[1]);
        assert!(inner.is_capturing());
        assert_eq!(outer.blocks[2], Block::Literal(3.0));
        assert_eq!(outer.blocks[3], Block::Group(GroupMarker::Close));
    }

    #[test]
    fn test_group_without_quantifier_stays_flat() {
        let p = parse("(1 2) 3");
        assert_eq!(
            p.blocks,
            vec![
                Block::Group(GroupMarker::Open),
                Block::Literal(1.0),
                Block::Literal(2.0),
                Block::Group(GroupMarker::Close),
                Block::Literal(3.0),
            ]
        );
    }

    #[test]
    fn test_checkers() {
        for (src, op) in [
            ("=5", CompareOp::Eq),
            (">5", CompareOp::Gt),
            (">=5", CompareOp::Gte),
            ("> = 5", CompareOp::Gte),
            ("<5", CompareOp::Lt),
            ("<=5", CompareOp::Lte),
        ] {
            let p = parse(src);
            assert_eq!(
                p.blocks,
                vec![Block::Checker(Checker {
                    op,
                    threshold: Bound::Value(5.0),
                })],
                "failed for {src}"
            );
        }
    }

    #[test]
    fn test_percent_checker() {
        let p = parse("1 >10%");
        assert_eq!(
            p.blocks[1],
            Block::Checker(Checker {
                op: CompareOp::Gt,
                threshold: Bound::Percent(0.1),
            })
        );
    }

    #[test]
    fn test_checker_requires_value() {
        let err = parse_err(">asc");
        assert_eq!(err.kind, CompileErrorKind::Syntax);
        assert!(err.message.contains("expected number or percentage"));
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn test_unclosed_group_reports_end_of_input() {
        let err = parse_err("(1 2");
        assert_eq!(err.kind, CompileErrorKind::Syntax);
        assert!(err.message.contains("unclosed group"));
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_unmatched_close_paren() {
        let err = parse_err("1 2)");
        assert!(err.message.contains("unmatched ')'"));
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_leading_quantifier_rejected() {
        let err = parse_err("*5");
        assert!(err.message.contains("unexpected token '*'"));
    }

    #[test]
    fn test_double_quantifier_rejected() {
        let err = parse_err("5**");
        assert!(err.message.contains("unexpected token '*'"));
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_interval_missing_colon() {
        let err = parse_err("[1 2]");
        assert!(err.message.contains("expected ':', got integer '2'"));
    }

    #[test]
    fn test_interval_missing_close() {
        let err = parse_err("[1:2");
        assert!(err.message.contains("expected ']', got end of pattern"));
    }

    #[test]
    fn test_interval_semicolon_requires_function() {
        let err = parse_err("[1:2;3]");
        assert!(err.message.contains("expected function name"));
    }

    #[test]
    fn test_limiter_max_below_min() {
        let err = parse_err("5{4:2}");
        assert!(err.message.contains("less than minimum"));
    }

    #[test]
    fn test_limiter_negative_count() {
        let err = parse_err("5{-1}");
        assert!(err.message.contains("non-negative"));
    }

    #[test]
    fn test_limiter_requires_integer_or_percent() {
        let err = parse_err("5{1.5}");
        assert!(err.message.contains("expected integer or percentage"));
    }

    #[test]
    fn test_limiter_percent_colon_requires_percent() {
        let err = parse_err("5{1%:2}");
        assert!(err.message.contains("expected percentage"));
    }

    #[test]
    fn test_limiter_percent_order() {
        let err = parse_err("5{10%:1%}");
        assert!(err.message.contains("upper percentage"));
    }

    #[test]
    fn test_tokens_after_end_anchor_rejected() {
        let err = parse_err("5$ 6");
        assert!(err.message.contains("end of pattern after '$'"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(parse_err("").message.contains("empty"));
        assert!(parse_err("   ").message.contains("empty"));
        assert!(parse_err("^$").message.contains("empty"));
    }

    #[test]
    fn test_lexical_error_propagates() {
        let err = parse_err("1 & 2");
        assert_eq!(err.kind, CompileErrorKind::Lexical);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_percent_at_top_level_rejected() {
        let err = parse_err("10%");
        assert!(err.message.contains("unexpected token percentage"));
    }

    #[test]
    fn test_integer_element_type() {
        let p = compile::<i64>("1 [2:3] >4").unwrap();
        assert_eq!(p.blocks[0], Block::Literal(1));
        let err = compile::<i64>("1.5").unwrap_err();
        assert!(err.message.contains("not representable"));
    }

    #[test]
    fn test_unknown_function_compiles() {
        // Resolution is deferred to execution time.
        let p = parse("[1:2;bogus]");
        assert_eq!(p.functions[0].name, "bogus");
        assert_eq!(p.functions[0].arity, 0);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let src = "^(1 [0%:5%;asc])+ 2{1:3} >=10% $";
        assert_eq!(parse(src), parse(src));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn compile_never_panics(input in "[0-9 .,%()\\[\\]{}:;*+?<>=^$a-z-]{0,24}") {
            let _ = compile::<f64>(&input);
        }

        #[test]
        fn compile_twice_is_equal(
            values in proptest::collection::vec(-1000i64..1000, 1..6),
            quantifier in prop::sample::select(vec!["", "*", "+", "?", "{2}", "{1:3}", "{5%}"]),
        ) {
            let body = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            let src = format!("({body}){quantifier}");
            let a = compile::<f64>(&src).unwrap();
            let b = compile::<f64>(&src).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
