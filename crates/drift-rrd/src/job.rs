//! Accumulation of named calculation steps into one engine invocation.
//!
//! A [`QueryJob`] owns an append-only, ordered list of named steps plus
//! the global graph parameters. Registration order is also dependency
//! order: every registration validates that referenced names are already
//! in the job's symbol table, and duplicate names are rejected instead of
//! silently overriding each other in the engine's namespace.
//!
//! A job is consumed by [`crate::Engine::run`], so it can neither be
//! executed twice nor extended after execution.

use crate::error::{QueryError, Result};
use crate::expr::{RpnExpr, RpnOp};
use crate::types::{Consolidation, StepKind, StepName};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Output format for `PRINT` directives. The reducer's line pattern
/// depends on this exact shape; it is deliberately not configurable.
pub const PRINT_FORMAT: &str = "%6.2lf";

/// Default graph width in steps (six weeks of one-minute steps).
const DEFAULT_WIDTH: u32 = 12_096;

/// Default seconds per graph step.
const DEFAULT_STEP_SECS: u32 = 60;

/// Serialized form of one step, typed until rendering.
#[derive(Debug, Clone, PartialEq)]
enum StepPayload {
    /// Raw series extraction.
    Def {
        rrd_file: PathBuf,
        ds_index: u32,
        consolidation: Consolidation,
    },
    /// Calculated series.
    Cdef(RpnExpr),
    /// Single-value reduction.
    Vdef(RpnExpr),
    /// Output request for a previously reduced value.
    Print { value: StepName },
}

/// One named calculation step in a job.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStep {
    name: StepName,
    kind: StepKind,
    payload: StepPayload,
}

impl NamedStep {
    /// The step's unique name within its job.
    #[must_use]
    pub fn name(&self) -> &StepName {
        &self.name
    }

    /// The kind of calculation this step performs.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Renders the step as one engine command-line argument.
    #[must_use]
    pub fn directive(&self) -> String {
        match &self.payload {
            StepPayload::Def {
                rrd_file,
                ds_index,
                consolidation,
            } => format!(
                "DEF:{}={}:{}:{}",
                self.name,
                rrd_file.display(),
                ds_index,
                consolidation.as_engine_str()
            ),
            StepPayload::Cdef(expr) => format!("CDEF:{}={}", self.name, expr.render()),
            StepPayload::Vdef(expr) => format!("VDEF:{}={}", self.name, expr.render()),
            StepPayload::Print { value } => {
                format!("PRINT:{value}:{value} = {PRINT_FORMAT}")
            }
        }
    }
}

/// An accumulating batch of dependent calculation steps.
///
/// The job holds the global query parameters (time span, graph geometry,
/// scratch artifact path) and the ordered steps registered so far. All
/// `define_*` operations append exactly one step and return its generated
/// [`StepName`] unless noted otherwise.
#[derive(Debug, Clone)]
pub struct QueryJob {
    width: u32,
    step_secs: u32,
    out_file: PathBuf,
    start: String,
    end: String,
    steps: Vec<NamedStep>,
    names: BTreeMap<String, StepKind>,
}

impl QueryJob {
    /// Creates an empty job writing its throwaway graph artifact to
    /// `out_file`, spanning the default six-week lookback ending now.
    pub fn new(out_file: impl Into<PathBuf>) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            step_secs: DEFAULT_STEP_SECS,
            out_file: out_file.into(),
            start: "end-6w".to_string(),
            end: "now".to_string(),
            steps: Vec::new(),
            names: BTreeMap::new(),
        }
    }

    /// Sets the query time span. Both bounds are engine time
    /// specifications (e.g. `end-6w`, `now`, an epoch) passed verbatim.
    #[must_use]
    pub fn with_span(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    /// Sets the graph geometry: width in steps and seconds per step.
    #[must_use]
    pub fn with_geometry(mut self, width: u32, step_secs: u32) -> Self {
        self.width = width;
        self.step_secs = step_secs;
        self
    }

    /// Registers a raw series extraction.
    ///
    /// The generated name deterministically encodes the metric name and
    /// consolidation function (`ds<metric>_<cf>`), so the same inputs
    /// always regenerate the same name.
    pub fn define_series(
        &mut self,
        rrd_file: &Path,
        ds_index: u32,
        metric: &str,
        consolidation: Consolidation,
    ) -> Result<StepName> {
        let name = StepName::new(format!("ds{metric}_{consolidation}"));
        self.insert(
            name,
            StepKind::RawSeries,
            StepPayload::Def {
                rrd_file: rrd_file.to_path_buf(),
                ds_index,
                consolidation,
            },
        )
    }

    /// Registers a left-associative sum over previously defined steps.
    ///
    /// Two or more inputs produce `a,b,+,c,+,...`; exactly one input
    /// degenerates to a direct reference with no operator; zero inputs
    /// fail with [`QueryError::EmptyAggregate`].
    pub fn define_aggregate(&mut self, name: &str, inputs: &[StepName]) -> Result<StepName> {
        let Some((first, rest)) = inputs.split_first() else {
            return Err(QueryError::EmptyAggregate {
                name: name.to_string(),
            });
        };

        let mut expr = RpnExpr::new();
        expr.push_ref(first);
        for input in rest {
            expr.push_ref(input).push_op(RpnOp::Add);
        }

        self.check_references(&expr)?;
        self.insert(
            StepName::new(name),
            StepKind::Aggregate,
            StepPayload::Cdef(expr),
        )
    }

    /// Registers a moving-window trend smoothing of `input`.
    ///
    /// Half of `window_secs` is used as the smoothing radius, suppressing
    /// transient drops before the series is compared to its prediction.
    pub fn define_smooth(&mut self, input: &StepName, window_secs: u32) -> Result<StepName> {
        let mut expr = RpnExpr::new();
        expr.push_ref(input)
            .push_int(i64::from(window_secs / 2))
            .push_op(RpnOp::TrendNan);

        self.check_references(&expr)?;
        self.insert(
            StepName::new(format!("{input}_smooth")),
            StepKind::Smooth,
            StepPayload::Cdef(expr),
        )
    }

    /// Registers the prediction pair for `input`: the forecast value and
    /// its historical standard deviation, both driven by the same basis
    /// (period length, period count, window width).
    ///
    /// A negative `period_count` shifts backward in time, which is the
    /// usual direction. Returns `(predicted, sigma)`.
    pub fn define_prediction(
        &mut self,
        input: &StepName,
        period_secs: u32,
        period_count: i32,
        window_secs: u32,
    ) -> Result<(StepName, StepName)> {
        let pred_name = StepName::new(format!("{input}_pred"));
        let sigma_name = StepName::new(format!("{input}_sigma"));
        // Reject both collisions before registering either half.
        self.check_free(&pred_name)?;
        self.check_free(&sigma_name)?;

        let basis = |op: RpnOp| {
            let mut expr = RpnExpr::new();
            expr.push_int(i64::from(period_secs))
                .push_int(i64::from(period_count))
                .push_int(i64::from(window_secs))
                .push_ref(input)
                .push_op(op);
            expr
        };

        let pred_expr = basis(RpnOp::Predict);
        self.check_references(&pred_expr)?;
        let pred = self.insert(pred_name, StepKind::Predicted, StepPayload::Cdef(pred_expr))?;
        let sigma = self.insert(
            sigma_name,
            StepKind::PredictedSigma,
            StepPayload::Cdef(basis(RpnOp::PredictSigma)),
        )?;
        Ok((pred, sigma))
    }

    /// Registers the deviation score of `input` against its prediction.
    ///
    /// The score is `abs(input - pred) / sigma`, in units of standard
    /// deviation; when sigma evaluates to zero the score is defined as
    /// zero so the division can never poison the result with NaN.
    pub fn define_deviation(
        &mut self,
        input: &StepName,
        pred: &StepName,
        sigma: &StepName,
    ) -> Result<StepName> {
        let mut expr = RpnExpr::new();
        expr.push_ref(sigma)
            .push_int(0)
            .push_op(RpnOp::Eq)
            .push_int(0)
            .push_ref(input)
            .push_ref(pred)
            .push_op(RpnOp::Sub)
            .push_op(RpnOp::Abs)
            .push_ref(sigma)
            .push_op(RpnOp::Div)
            .push_op(RpnOp::If);

        self.check_references(&expr)?;
        self.insert(
            StepName::new(format!("{input}_diff")),
            StepKind::DeviationScore,
            StepPayload::Cdef(expr),
        )
    }

    /// Requests one output line for the most recent value of `input`.
    ///
    /// Appends the single-value reduction (`curr_<input>`) and the print
    /// request that emits `curr_<input> = <value>` at run time. Returns
    /// the output token the reducer will key the parsed value under: the
    /// input name with its leading `ds` stripped. Every name generated by
    /// [`define_series`](Self::define_series) and the steps derived from
    /// it carries that prefix; aggregates must be named accordingly for
    /// their output to be recovered.
    pub fn request_output(&mut self, input: &StepName) -> Result<String> {
        let value_name = StepName::new(format!("curr_{input}"));
        let print_name = StepName::new(format!("curr_{input}_print"));
        self.check_free(&value_name)?;
        self.check_free(&print_name)?;

        let mut expr = RpnExpr::new();
        expr.push_ref(input).push_op(RpnOp::Last);
        self.check_references(&expr)?;

        let value = self.insert(value_name, StepKind::CurrentValue, StepPayload::Vdef(expr))?;
        self.insert(
            print_name,
            StepKind::PrintRequest,
            StepPayload::Print { value },
        )?;

        let token = input
            .as_str()
            .strip_prefix("ds")
            .unwrap_or(input.as_str());
        Ok(token.to_string())
    }

    /// Output tokens of every print request registered so far, in
    /// registration order.
    #[must_use]
    pub fn expected_tokens(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter_map(|step| match &step.payload {
                StepPayload::Print { value } => {
                    let name = value.as_str();
                    let name = name.strip_prefix("curr_").unwrap_or(name);
                    Some(name.strip_prefix("ds").unwrap_or(name).to_string())
                }
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if at least one print request has been registered.
    /// A job without one produces no data lines and reduces to an empty
    /// mapping.
    #[must_use]
    pub fn has_print_request(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.kind == StepKind::PrintRequest)
    }

    /// The registered steps, in registration (= dependency) order.
    #[must_use]
    pub fn steps(&self) -> &[NamedStep] {
        &self.steps
    }

    /// Serializes the job into the engine's argument vector: global
    /// parameters first, then every step's directive in registration
    /// order.
    #[must_use]
    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec![
            "graph".to_string(),
            "--width".to_string(),
            self.width.to_string(),
            "--step".to_string(),
            self.step_secs.to_string(),
            self.out_file.display().to_string(),
            "--start".to_string(),
            self.start.clone(),
            "--end".to_string(),
            self.end.clone(),
        ];
        args.extend(self.steps.iter().map(NamedStep::directive));
        args
    }

    fn check_free(&self, name: &StepName) -> Result<()> {
        if self.names.contains_key(name.as_str()) {
            return Err(QueryError::AlreadyDefined {
                name: name.as_str().to_string(),
            });
        }
        Ok(())
    }

    fn check_references(&self, expr: &RpnExpr) -> Result<()> {
        for reference in expr.references() {
            if !self.names.contains_key(reference.as_str()) {
                return Err(QueryError::UnknownReference {
                    name: reference.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, name: StepName, kind: StepKind, payload: StepPayload) -> Result<StepName> {
        self.check_free(&name)?;
        self.names.insert(name.as_str().to_string(), kind);
        self.steps.push(NamedStep {
            name: name.clone(),
            kind,
            payload,
        });
        Ok(name)
    }
}
