//! Typed model for the engine's stack-based (RPN) expression language.
//!
//! Expressions are accumulated as typed terms and rendered to the
//! comma-joined textual form only when the owning job serializes itself
//! into a command line. Building from [`StepName`] values (instead of raw
//! strings) means an expression can only reference steps that were
//! registered earlier.

use crate::types::StepName;
use std::fmt;

/// An operator or built-in function of the RPN language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpnOp {
    /// Pop two values, push their sum.
    Add,
    /// Pop two values, push their difference.
    Sub,
    /// Pop two values, push their quotient.
    Div,
    /// Pop one value, push its absolute value.
    Abs,
    /// Pop two values, push 1 if equal, else 0.
    Eq,
    /// Pop condition and two branches, push the selected branch.
    If,
    /// Moving-window average that ignores unknown data points.
    TrendNan,
    /// Forecast from shifted historical windows.
    Predict,
    /// Standard deviation of the forecast basis.
    PredictSigma,
    /// Most recent value of a series (`VDEF` reduction).
    Last,
}

impl RpnOp {
    /// Spelling in the engine's expression language.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Div => "/",
            Self::Abs => "ABS",
            Self::Eq => "EQ",
            Self::If => "IF",
            Self::TrendNan => "TRENDNAN",
            Self::Predict => "PREDICT",
            Self::PredictSigma => "PREDICTSIGMA",
            Self::Last => "LAST",
        }
    }
}

impl fmt::Display for RpnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One operand or operator in an RPN expression.
#[derive(Debug, Clone, PartialEq)]
enum Term {
    /// Reference to a previously registered step.
    Ref(StepName),
    /// Integer literal (window widths, period lengths, counts).
    Int(i64),
    /// Operator or built-in function.
    Op(RpnOp),
}

/// An RPN expression under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpnExpr {
    terms: Vec<Term>,
}

impl RpnExpr {
    /// Creates an empty expression.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a reference to a previously registered step.
    pub fn push_ref(&mut self, name: &StepName) -> &mut Self {
        self.terms.push(Term::Ref(name.clone()));
        self
    }

    /// Pushes an integer literal.
    pub fn push_int(&mut self, value: i64) -> &mut Self {
        self.terms.push(Term::Int(value));
        self
    }

    /// Pushes an operator.
    pub fn push_op(&mut self, op: RpnOp) -> &mut Self {
        self.terms.push(Term::Op(op));
        self
    }

    /// Number of terms pushed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if no terms have been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Names of all steps this expression references, in push order.
    pub(crate) fn references(&self) -> impl Iterator<Item = &StepName> {
        self.terms.iter().filter_map(|t| match t {
            Term::Ref(name) => Some(name),
            _ => None,
        })
    }

    /// Renders the expression in the engine's comma-joined textual form.
    #[must_use]
    pub fn render(&self) -> String {
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|t| match t {
                Term::Ref(name) => name.as_str().to_string(),
                Term::Int(value) => value.to_string(),
                Term::Op(op) => op.as_str().to_string(),
            })
            .collect();
        parts.join(",")
    }
}

impl fmt::Display for RpnExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
