//! Error kinds reported by the circuit-logic engine.
//!
//! Every failure ends the current analysis run. Nothing is defaulted to an
//! empty or zero result.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The formula references a name that no component declares.
    #[error("unknown variable `{name}`")]
    UnknownVariable { name: String },

    /// The formula does not follow the `And(..)`/`Or(..)`/`Not(..)` grammar.
    #[error("malformed expression at position {position}: {message}")]
    MalformedExpression { message: String, position: usize },

    /// Two sub-circuits, or two components of one sub-circuit, share a name.
    #[error("duplicate {kind} name `{name}`")]
    DuplicateName { kind: &'static str, name: String },

    #[error("circuit has no components")]
    EmptyCircuit,

    #[error("invalid delay {delay} for signal `{signal}`")]
    InvalidDelay { signal: String, delay: i64 },

    /// The analysis ran out of budget before it finished: the decision
    /// diagram outgrew its node limit (`resource` is `"node"`), or
    /// simplification assembled more cubes than allowed (`"cube"`).
    #[error("analysis incomplete: {resource} limit of {limit} exceeded")]
    AnalysisTimeout { resource: &'static str, limit: usize },

    #[error("invalid component: {reason}")]
    InvalidComponent { reason: String },

    #[error("component `{component}` of `{sub_circuit}`: {source}")]
    Component {
        sub_circuit: String,
        component: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>, position: usize) -> Self {
        Error::MalformedExpression {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn in_component(self, sub_circuit: &str, component: &str) -> Self {
        Error::Component {
            sub_circuit: sub_circuit.to_string(),
            component: component.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the underlying error with all component context removed.
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Error::Component { source, .. } = current {
            current = source;
        }
        current
    }
}
