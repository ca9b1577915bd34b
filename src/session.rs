use log::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::service::{Endpoint, Reply};
use crate::translator::{self, INVALID_INPUT};
use crate::types::{Assignment, Formula};

pub const EMPTY_INPUT: &str = "Nothing to solve. Enter at least one clause.";
pub const WAITING: &str = "Solving...";
pub const SOLVE_FAILED: &str = "Error: Unable to solve the problem.";
pub const RANDOM_FAILED: &str = "Error: Unable to fetch a random example.";
pub const NO_ASSIGNMENT: &str = "X";

const RANDOM_ARG: &str = "random";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source { Solve, Random, }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rendering,
    AwaitingSolution,
    /// `None` when the service answered with an empty assignment
    Solved(Option<Assignment>),
    AwaitingRandom,
    RandomReady,
    Failed { source: Source, reason: Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub seq      : u64,
    pub endpoint : Endpoint,
    pub arg      : String,
}

/// What the presentation layer has to carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowFormula(String),
    ShowResult(String),
    SetInput(String),
    Send(Request),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InputChanged(String),
    Solve,
    Random,
    Response { seq: u64, reply: Result<Reply> },
}

/// Lifecycle of solve and random-example requests.
///
/// Every request is tagged with a sequence number; a response is applied
/// only if it answers the request currently outstanding for its endpoint.
/// At most one solve and one random request are outstanding at a time, and
/// asking for another while one is in flight is rejected without effects.
/// `phase` follows the most recent transition, except that settling one
/// request while the other is outstanding leaves the phase awaiting the other.
#[derive(Debug)]
pub struct SolveSession {
    phase          : Phase,
    input          : String,
    next_seq       : u64,
    pending_solve  : Option<(u64, Formula)>,
    pending_random : Option<u64>,
    last_error     : Option<Error>,
}

impl Default for SolveSession {
    fn default() -> SolveSession {
        SolveSession::new()
    }
}

impl SolveSession {
    pub fn new() -> SolveSession {
        SolveSession {
            phase: Phase::Idle,
            input: String::new(),
            next_seq: 1,
            pending_solve: None,
            pending_random: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// most recent local or service error, kept for diagnostics
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    pub fn awaiting_solution(&self) -> bool {
        self.pending_solve.is_some()
    }

    pub fn awaiting_random(&self) -> bool {
        self.pending_random.is_some()
    }

    fn in_flight(&self) -> bool {
        self.awaiting_solution() || self.awaiting_random()
    }

    fn outstanding_phase(&self) -> Option<Phase> {
        match (self.awaiting_solution(), self.awaiting_random()) {
            (true, _) => Some(Phase::AwaitingSolution),
            (false, true) => Some(Phase::AwaitingRandom),
            (false, false) => None,
        }
    }

    fn issue(&mut self, endpoint: Endpoint, arg: String) -> Request {
        let seq = self.next_seq;
        self.next_seq += 1;
        debug!("issuing request #{seq} to {}", endpoint.path());
        Request { seq, endpoint, arg }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::InputChanged(text) => self.input_changed(text),
            Event::Solve => self.solve(),
            Event::Random => self.random(),
            Event::Response { seq, reply } => self.response(seq, reply),
        }
    }

    /// Re-renders. Never touches the network and never fails the session.
    pub fn input_changed(&mut self, text: String) -> Vec<Effect> {
        let rendering = translator::render_text(&text);
        self.input = text;
        if !self.in_flight() {
            self.phase = Phase::Rendering;
        }
        vec![Effect::ShowFormula(rendering)]
    }

    pub fn solve(&mut self) -> Vec<Effect> {
        if let Some((seq, _)) = &self.pending_solve {
            warn!("solve rejected, request #{seq} is still outstanding");
            return Vec::new();
        }

        let lines = translator::parse_lines(&self.input);
        let document = match translator::to_exchange_document(&lines) {
            Ok(document) => document,
            Err(e) => {
                debug!("solve aborted: {e}");
                let warning = match e {
                    Error::EmptyFormula => EMPTY_INPUT,
                    _ => INVALID_INPUT,
                };
                self.last_error = Some(e);
                if !self.in_flight() {
                    self.phase = Phase::Idle;
                }
                return vec![Effect::ShowFormula(warning.to_string())];
            }
        };

        let request = self.issue(Endpoint::Solution, document.to_string());
        self.pending_solve = Some((request.seq, Formula::new(document.clauses)));
        self.phase = Phase::AwaitingSolution;

        vec![Effect::ShowResult(WAITING.to_string()), Effect::Send(request)]
    }

    pub fn random(&mut self) -> Vec<Effect> {
        if let Some(seq) = self.pending_random {
            warn!("random example rejected, request #{seq} is still outstanding");
            return Vec::new();
        }
        info!("fetching random example");

        let request = self.issue(Endpoint::Random, RANDOM_ARG.to_string());
        self.pending_random = Some(request.seq);
        self.phase = Phase::AwaitingRandom;

        vec![Effect::Send(request)]
    }

    pub fn response(&mut self, seq: u64, reply: Result<Reply>) -> Vec<Effect> {
        let effects = match self.pending_solve.take() {
            Some((s, formula)) if s == seq => self.solution_arrived(&formula, reply),
            pending => {
                self.pending_solve = pending;
                if self.pending_random != Some(seq) {
                    debug!("discarding stale response #{seq}");
                    return Vec::new();
                }
                self.pending_random = None;
                self.random_arrived(reply)
            }
        };
        if let Some(phase) = self.outstanding_phase() {
            debug!("request #{seq} settled, still {phase:?}");
            self.phase = phase;
        }
        effects
    }

    fn fail(&mut self, source: Source, reason: Error) -> Vec<Effect> {
        error!("{source:?} request failed: {reason}");
        self.last_error = Some(reason.clone());
        self.phase = Phase::Failed { source, reason };
        let message = match source {
            Source::Solve => SOLVE_FAILED,
            Source::Random => RANDOM_FAILED,
        };
        vec![Effect::ShowResult(message.to_string())]
    }

    fn solution_arrived(&mut self, formula: &Formula, reply: Result<Reply>) -> Vec<Effect> {
        let assignment = match reply {
            Ok(message) => message.map(Assignment::new),
            Err(e) => return self.fail(Source::Solve, e),
        };

        if let Some(values) = assignment.as_ref().and_then(Assignment::values) {
            match formula.is_satisfied_by(&values) {
                true => info!("returned assignment satisfies the formula"),
                false => warn!("returned assignment does not satisfy the formula"),
            }
        }

        let shown = match &assignment {
            Some(a) => format!("Solution: {a}"),
            None => format!("Solution: {NO_ASSIGNMENT}"),
        };
        self.phase = Phase::Solved(assignment);
        vec![Effect::ShowResult(shown)]
    }

    fn random_arrived(&mut self, reply: Result<Reply>) -> Vec<Effect> {
        let text = match reply {
            Ok(Some(text)) => text,
            Ok(None) => {
                return self.fail(Source::Random, Error::MalformedServiceResponse("empty random example".to_string()));
            },
            Err(e) => return self.fail(Source::Random, e),
        };
        let raw = match translator::from_exchange_document(&text) {
            Ok(raw) => raw,
            Err(e) => return self.fail(Source::Random, e),
        };

        let rendering = translator::render_text(&raw);
        self.input = raw.clone();
        self.phase = Phase::RandomReady;
        vec![Effect::SetInput(raw), Effect::ShowFormula(rendering)]
    }
}
