//! DEM text parser.
//!
//! Parsing runs in two phases. The text is first lexed into a tree of
//! statements, with every syntactic check done once per line, so a body
//! repeated a million times is validated once. The tree is then executed:
//! repeat blocks are unrolled, detector ids and coordinates are shifted, and
//! each instruction is handed to the parser's actions.
//!
//! # Supported Syntax
//!
//! ```text
//! error[tag](p) D<i> D<j> L<k> ^ D<m> ...
//! detector[tag](c0, c1, ..., t) D<i> ...
//! logical_observable L<k>
//! shift_detectors(dc0, dc1, ...) N
//! detector_separator
//! repeat N {
//!     ...
//! }
//! ```
//!
//! Instruction names are case-insensitive and `#` starts a comment.

use core::fmt;
use std::collections::BTreeSet;

use super::actions::{DetectorAction, ErrorAction, LogicalAction};
use super::instruction::{DetectorInstruction, ErrorComponent, ErrorInstruction};
use super::options::ParserOptions;
use crate::error::{DemErrorKind, DemParsingError};
use crate::graph::Probability;

// =============================================================================
// Warnings
// =============================================================================

/// A non-fatal condition met while parsing.
///
/// Warnings never change what the parser produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    /// A tag was found while tag support is disabled; it was dropped.
    TagIgnored {
        /// Line of the tagged instruction.
        line: usize,
        /// The dropped tag.
        tag: String,
    },
    /// A `detector_separator` instruction was skipped.
    SeparatorIgnored {
        /// Line of the instruction.
        line: usize,
    },
    /// A declared observable that no error flips.
    UnusedObservable {
        /// The observable.
        index: u32,
    },
    /// An unknown instruction skipped because strict mode is off.
    UnknownInstruction {
        /// Line of the instruction.
        line: usize,
        /// Its name.
        name: String,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagIgnored { line, tag } => {
                write!(f, "line {line}: tag [{tag}] ignored, tag support is disabled")
            }
            Self::SeparatorIgnored { line } => {
                write!(f, "line {line}: detector_separator ignored")
            }
            Self::UnusedObservable { index } => {
                write!(f, "logical observable L{index} has no contributing errors")
            }
            Self::UnknownInstruction { line, name } => {
                write!(f, "line {line}: unknown instruction `{name}` skipped")
            }
        }
    }
}

/// Reports a declared observable with no contributing errors.
///
/// The circuit is legal but the observable can never be flipped, which
/// usually means it was mislabelled.
pub fn observable_warning(index: u32) -> ParseWarning {
    tracing::warn!(observable = index, "logical observable has no contributing errors");
    ParseWarning::UnusedObservable { index }
}

/// Counts of what a parse executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Executed `error` instructions, repeats unrolled.
    pub errors: usize,
    /// Executed detector declarations (one per target), repeats unrolled.
    pub detectors: usize,
    /// Distinct declared observables.
    pub observables: usize,
}

// =============================================================================
// Statement tree
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Detector(u64),
    Logical(u32),
    Separator,
}

#[derive(Clone, Debug)]
enum Statement {
    Error {
        line: usize,
        probability: Probability,
        targets: Vec<Target>,
        tag: Option<String>,
    },
    Detector {
        line: usize,
        coordinates: Vec<f64>,
        targets: Vec<u64>,
        tag: Option<String>,
    },
    LogicalObservable {
        targets: Vec<u32>,
    },
    ShiftDetectors {
        coords: Vec<f64>,
        detectors: u64,
    },
    Repeat {
        count: u64,
        body: Vec<Statement>,
    },
}

/// One non-empty line split into `name[tag](args) targets`.
struct Lexed<'a> {
    number: usize,
    text: &'a str,
    name: String,
    tag: Option<&'a str>,
    args: Vec<&'a str>,
    targets: Vec<&'a str>,
}

impl Lexed<'_> {
    fn error(&self, kind: DemErrorKind) -> DemParsingError {
        DemParsingError::new(self.number, self.text, kind)
    }
}

fn lex_line(number: usize, raw: &str) -> Result<Option<Lexed<'_>>, DemParsingError> {
    let text = raw.split_once('#').map_or(raw, |(head, _)| head).trim();
    if text.is_empty() {
        return Ok(None);
    }
    let malformed = |msg: &str| {
        DemParsingError::new(number, text, DemErrorKind::Malformed(msg.to_string()))
    };

    let name_end = text
        .find(|c: char| c == '[' || c == '(' || c.is_whitespace())
        .unwrap_or(text.len());
    let name = text[..name_end].to_ascii_lowercase();
    let mut rest = &text[name_end..];

    let mut tag = None;
    if let Some(after) = rest.strip_prefix('[') {
        let close = after.find(']').ok_or_else(|| malformed("unterminated tag"))?;
        tag = Some(&after[..close]);
        rest = &after[close + 1..];
    }

    let mut args = Vec::new();
    if let Some(after) = rest.trim_start().strip_prefix('(') {
        let close = after
            .find(')')
            .ok_or_else(|| malformed("unterminated argument list"))?;
        let inner = after[..close].trim();
        if !inner.is_empty() {
            args = inner.split(',').map(str::trim).collect();
        }
        rest = &after[close + 1..];
    }

    Ok(Some(Lexed {
        number,
        text,
        name,
        tag,
        args,
        targets: split_targets(rest),
    }))
}

/// Whitespace-separated targets with every `^` as its own token.
fn split_targets(rest: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for token in rest.split_whitespace() {
        let mut parts = token.split('^');
        if let Some(first) = parts.next().filter(|p| !p.is_empty()) {
            out.push(first);
        }
        for part in parts {
            out.push("^");
            if !part.is_empty() {
                out.push(part);
            }
        }
    }
    out
}

fn parse_index<T: core::str::FromStr>(token: &str, prefix: char) -> Option<T> {
    let digits = token
        .strip_prefix(prefix)
        .or_else(|| token.strip_prefix(prefix.to_ascii_lowercase()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_coords(line: &Lexed<'_>) -> Result<Vec<f64>, DemParsingError> {
    line.args
        .iter()
        .map(|a| {
            a.parse::<f64>()
                .ok()
                .filter(|c| c.is_finite())
                .ok_or_else(|| line.error(DemErrorKind::InvalidCoordinate((*a).to_string())))
        })
        .collect()
}

// =============================================================================
// Execution state
// =============================================================================

#[derive(Debug, Default)]
struct ExecState {
    detector_offset: u64,
    coord_offset: Vec<f64>,
    declared: BTreeSet<u32>,
    flipped: BTreeSet<u32>,
    summary: ParseSummary,
}

// =============================================================================
// Parser
// =============================================================================

/// Parses DEM text, driving an [`ErrorAction`], a [`DetectorAction`] and a
/// [`LogicalAction`].
///
/// # Example
///
/// ```
/// use decograph_core::dem::{DemParser, DetectorCounter, ErrorInstruction};
///
/// let mut probabilities = Vec::new();
/// let mut parser = DemParser::new(
///     |e: &ErrorInstruction| probabilities.push(e.probability.get()),
///     DetectorCounter::new(),
///     |_: u32| {},
/// );
/// let summary = parser.parse("repeat 2 {\n error(0.1) D0\n shift_detectors 1\n}").unwrap();
/// assert_eq!(summary.errors, 2);
/// let (_, counter, _) = parser.into_actions();
/// assert_eq!(counter.count(), 2);
/// assert_eq!(probabilities, vec![0.1, 0.1]);
/// ```
#[derive(Debug)]
pub struct DemParser<E, D, L> {
    options: ParserOptions,
    errors: E,
    detectors: D,
    logicals: L,
    warnings: Vec<ParseWarning>,
}

impl<E, D, L> DemParser<E, D, L>
where
    E: ErrorAction,
    D: DetectorAction,
    L: LogicalAction,
{
    /// Creates a parser with default options.
    pub fn new(errors: E, detectors: D, logicals: L) -> Self {
        Self {
            options: ParserOptions::default(),
            errors,
            detectors,
            logicals,
            warnings: Vec::new(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Options in use.
    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Warnings raised by the last call to [`parse`](Self::parse).
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Consumes the parser, returning its actions.
    pub fn into_actions(self) -> (E, D, L) {
        (self.errors, self.detectors, self.logicals)
    }

    /// Parses and executes `text`.
    ///
    /// Actions see every instruction executed before a failure.
    ///
    /// # Errors
    ///
    /// [`DemParsingError`] for malformed syntax, an out-of-range probability,
    /// a non-positive repeat count, an observable beyond
    /// [`max_logicals`](ParserOptions::max_logicals), unbalanced braces,
    /// `repeat` nesting beyond
    /// [`max_repeat_depth`](ParserOptions::max_repeat_depth), or a detector id
    /// overflowing after shifts.
    pub fn parse(&mut self, text: &str) -> Result<ParseSummary, DemParsingError> {
        self.warnings.clear();
        let lines: Vec<&str> = text.lines().collect();
        let program = self.lex(&lines)?;

        let mut state = ExecState::default();
        self.execute(&program, &lines, &mut state)?;

        state.summary.observables = state.declared.len();
        for &unused in state.declared.difference(&state.flipped) {
            self.warnings.push(observable_warning(unused));
        }

        tracing::debug!(
            lines = lines.len(),
            errors = state.summary.errors,
            detectors = state.summary.detectors,
            observables = state.summary.observables,
            warnings = self.warnings.len(),
            "dem parsed"
        );
        Ok(state.summary)
    }

    fn warn(&mut self, warning: ParseWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    // -------------------------------------------------------------------------
    // Phase 1: lexing
    // -------------------------------------------------------------------------

    fn lex(&mut self, lines: &[&str]) -> Result<Vec<Statement>, DemParsingError> {
        let mut current: Vec<Statement> = Vec::new();
        let mut open: Vec<(usize, &str, u64, Vec<Statement>)> = Vec::new();

        for (i, raw) in lines.iter().enumerate() {
            let Some(line) = lex_line(i + 1, raw)? else {
                continue;
            };
            let tag = self.accept_tag(&line);

            match line.name.as_str() {
                "}" => {
                    if !line.targets.is_empty() || !line.args.is_empty() {
                        return Err(line.error(DemErrorKind::Malformed(
                            "`}` must be on its own line".into(),
                        )));
                    }
                    let Some((_, _, count, parent)) = open.pop() else {
                        return Err(line.error(DemErrorKind::UnmatchedClose));
                    };
                    let body = std::mem::replace(&mut current, parent);
                    current.push(Statement::Repeat { count, body });
                }
                "repeat" => {
                    let max = self.options.max_repeat_depth();
                    if open.len() >= max {
                        return Err(line.error(DemErrorKind::NestingTooDeep { max }));
                    }
                    let count = self.lex_repeat(&line)?;
                    open.push((line.number, line.text, count, std::mem::take(&mut current)));
                }
                "error" => current.push(self.lex_error(&line, tag)?),
                "detector" => current.push(Self::lex_detector(&line, tag)?),
                "logical_observable" => current.push(self.lex_logical(&line)?),
                "shift_detectors" => current.push(Self::lex_shift(&line)?),
                "detector_separator" => {
                    self.warn(ParseWarning::SeparatorIgnored { line: line.number });
                }
                _ if self.options.strict_instructions() => {
                    return Err(line.error(DemErrorKind::UnknownInstruction(line.name.clone())));
                }
                _ => self.warn(ParseWarning::UnknownInstruction {
                    line: line.number,
                    name: line.name.clone(),
                }),
            }
        }

        if let Some((number, text, _, _)) = open.pop() {
            return Err(DemParsingError::new(number, text, DemErrorKind::UnclosedRepeat));
        }
        Ok(current)
    }

    fn accept_tag(&mut self, line: &Lexed<'_>) -> Option<String> {
        let tag = line.tag?;
        if self.options.tags_enabled() {
            Some(tag.to_string())
        } else {
            self.warn(ParseWarning::TagIgnored {
                line: line.number,
                tag: tag.to_string(),
            });
            None
        }
    }

    fn check_logical(&self, line: &Lexed<'_>, index: u32) -> Result<u32, DemParsingError> {
        match self.options.max_logicals() {
            Some(max) if index >= max => {
                Err(line.error(DemErrorKind::LogicalOutOfRange { index, max }))
            }
            _ => Ok(index),
        }
    }

    fn lex_repeat(&self, line: &Lexed<'_>) -> Result<u64, DemParsingError> {
        let joined = line.targets.join(" ");
        let count_text = joined
            .strip_suffix('{')
            .ok_or_else(|| line.error(DemErrorKind::Malformed("expected `repeat N {`".into())))?
            .trim();
        match count_text.parse::<u64>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(line.error(DemErrorKind::InvalidRepeatCount(count_text.to_string()))),
        }
    }

    fn lex_error(&self, line: &Lexed<'_>, tag: Option<String>) -> Result<Statement, DemParsingError> {
        let [arg] = line.args.as_slice() else {
            return Err(line.error(DemErrorKind::Malformed(
                "error takes exactly one probability argument".into(),
            )));
        };
        let p: f64 = arg
            .parse()
            .map_err(|_| line.error(DemErrorKind::InvalidProbability((*arg).to_string())))?;
        let probability =
            Probability::new(p).map_err(|_| line.error(DemErrorKind::ProbabilityOutOfRange(p)))?;

        let targets = line
            .targets
            .iter()
            .map(|&t| {
                if t == "^" {
                    Ok(Target::Separator)
                } else if let Some(d) = parse_index::<u64>(t, 'D') {
                    Ok(Target::Detector(d))
                } else if let Some(l) = parse_index::<u32>(t, 'L') {
                    self.check_logical(line, l).map(Target::Logical)
                } else {
                    Err(line.error(DemErrorKind::InvalidTarget(t.to_string())))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Statement::Error {
            line: line.number,
            probability,
            targets,
            tag,
        })
    }

    fn lex_detector(line: &Lexed<'_>, tag: Option<String>) -> Result<Statement, DemParsingError> {
        let coordinates = parse_coords(line)?;
        let targets = line
            .targets
            .iter()
            .map(|&t| {
                parse_index::<u64>(t, 'D')
                    .ok_or_else(|| line.error(DemErrorKind::InvalidTarget(t.to_string())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Statement::Detector {
            line: line.number,
            coordinates,
            targets,
            tag,
        })
    }

    fn lex_logical(&self, line: &Lexed<'_>) -> Result<Statement, DemParsingError> {
        let targets = line
            .targets
            .iter()
            .map(|&t| {
                parse_index::<u32>(t, 'L')
                    .ok_or_else(|| line.error(DemErrorKind::InvalidTarget(t.to_string())))
                    .and_then(|l| self.check_logical(line, l))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Statement::LogicalObservable { targets })
    }

    fn lex_shift(line: &Lexed<'_>) -> Result<Statement, DemParsingError> {
        let coords = parse_coords(line)?;
        let detectors = match line.targets.as_slice() {
            [] => 0,
            [n] => n
                .parse::<u64>()
                .map_err(|_| line.error(DemErrorKind::InvalidTarget((*n).to_string())))?,
            _ => {
                return Err(line.error(DemErrorKind::Malformed(
                    "shift_detectors takes at most one detector offset".into(),
                )));
            }
        };
        Ok(Statement::ShiftDetectors { coords, detectors })
    }

    // -------------------------------------------------------------------------
    // Phase 2: execution
    // -------------------------------------------------------------------------

    fn execute(
        &mut self,
        program: &[Statement],
        lines: &[&str],
        state: &mut ExecState,
    ) -> Result<(), DemParsingError> {
        for statement in program {
            match statement {
                Statement::Error {
                    line,
                    probability,
                    targets,
                    tag,
                } => {
                    let instruction =
                        self.materialize_error(*line, *probability, targets, tag, lines, state)?;
                    state.flipped.extend(instruction.logicals());
                    state.summary.errors += 1;
                    self.errors.on_error(&instruction);
                }
                Statement::Detector {
                    line,
                    coordinates,
                    targets,
                    tag,
                } => {
                    let coordinates: Vec<f64> = coordinates
                        .iter()
                        .enumerate()
                        .map(|(i, c)| c + state.coord_offset.get(i).copied().unwrap_or(0.0))
                        .collect();
                    for &d in targets {
                        let id = Self::shifted(d, *line, lines, state)?;
                        let id = self.detectors.assign(id);
                        state.summary.detectors += 1;
                        self.detectors.record(&DetectorInstruction {
                            id,
                            coordinates: coordinates.clone(),
                            tag: tag.clone(),
                            line: *line,
                        });
                    }
                }
                Statement::LogicalObservable { targets } => {
                    for &l in targets {
                        state.declared.insert(l);
                        self.logicals.on_logical(l);
                    }
                }
                Statement::ShiftDetectors { coords, detectors } => {
                    if state.coord_offset.len() < coords.len() {
                        state.coord_offset.resize(coords.len(), 0.0);
                    }
                    for (offset, c) in state.coord_offset.iter_mut().zip(coords) {
                        *offset += c;
                    }
                    state.detector_offset = state.detector_offset.saturating_add(*detectors);
                }
                Statement::Repeat { count, body } => {
                    for _ in 0..*count {
                        self.execute(body, lines, state)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn materialize_error(
        &mut self,
        line: usize,
        probability: Probability,
        targets: &[Target],
        tag: &Option<String>,
        lines: &[&str],
        state: &ExecState,
    ) -> Result<ErrorInstruction, DemParsingError> {
        let mut components = Vec::new();
        let mut detectors = BTreeSet::new();
        let mut logicals = BTreeSet::new();

        for target in targets.iter().copied().chain(core::iter::once(Target::Separator)) {
            match target {
                Target::Detector(d) => {
                    let id = Self::shifted(d, line, lines, state)?;
                    let id = self.detectors.assign(id);
                    if !detectors.remove(&id) {
                        detectors.insert(id);
                    }
                }
                Target::Logical(l) => {
                    if !logicals.remove(&l) {
                        logicals.insert(l);
                    }
                }
                Target::Separator => {
                    let component = ErrorComponent {
                        detectors: std::mem::take(&mut detectors).into_iter().collect(),
                        logicals: std::mem::take(&mut logicals).into_iter().collect(),
                    };
                    if !component.is_empty() {
                        components.push(component);
                    }
                }
            }
        }

        Ok(ErrorInstruction {
            probability,
            components,
            tag: tag.clone(),
            line,
        })
    }

    fn shifted(
        id: u64,
        line: usize,
        lines: &[&str],
        state: &ExecState,
    ) -> Result<u32, DemParsingError> {
        let shifted = id.saturating_add(state.detector_offset);
        u32::try_from(shifted).map_err(|_| {
            let text = lines.get(line.wrapping_sub(1)).copied().unwrap_or_default();
            DemParsingError::new(line, text, DemErrorKind::DetectorOverflow(shifted))
        })
    }
}
