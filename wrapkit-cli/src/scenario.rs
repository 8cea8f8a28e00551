//! Scenario replay
//!
//! A scenario is a JSON document listing operations over named wrappers:
//!
//! ```json
//! { "steps": [
//!     { "op": "new", "wrapper": "bag" },
//!     { "op": "add", "wrapper": "bag", "object": "ticket", "payload": 1 },
//!     { "op": "split", "wrapper": "bag", "into": "half", "object": "ticket", "count": 1 }
//! ] }
//! ```
//!
//! Objects removed from a wrapper are reported as loose objects. Replay stops
//! at the first failing step.

use crate::demo::{Badge, DemoObject, DemoType, Ticket};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};
use wrapkit::{
    merge, shift, split, split_with_id, split_with_index, Identity, IdentityStore, WrapError,
    Wrapper,
};

/// Errors raised while loading or replaying a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: WrapError,
    },

    #[error("step {step}: unknown wrapper '{name}'")]
    UnknownWrapper { step: usize, name: String },

    #[error("step {step}: wrapper '{name}' already exists")]
    NameTaken { step: usize, name: String },

    #[error("step {step}: '{name}' named twice in one operation")]
    SameWrapper { step: usize, name: String },

    #[error("step {step}: no {object} with payload {payload} in '{wrapper}'")]
    NoSuchPayload {
        step: usize,
        wrapper: String,
        object: DemoType,
        payload: u64,
    },
}

/// A parsed scenario
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub steps: Vec<Op>,
}

/// One scenario step
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Op {
    New {
        wrapper: String,
        #[serde(default)]
        alias: Option<String>,
    },
    Add {
        wrapper: String,
        object: DemoType,
        payload: u64,
    },
    Remove {
        wrapper: String,
        object: DemoType,
        index: usize,
    },
    Take {
        wrapper: String,
        object: DemoType,
        payload: u64,
    },
    TakeAll {
        wrapper: String,
        object: DemoType,
    },
    Shift {
        from: String,
        to: String,
        object: DemoType,
    },
    Split {
        wrapper: String,
        into: String,
        object: DemoType,
        count: usize,
    },
    SplitWithIndex {
        wrapper: String,
        into: String,
        object: DemoType,
        indices: Vec<usize>,
    },
    SplitWithId {
        wrapper: String,
        into: String,
        object: DemoType,
        payloads: Vec<u64>,
    },
    Merge {
        first: String,
        second: String,
        into: String,
        object: DemoType,
    },
    SetAlias {
        wrapper: String,
        alias: String,
    },
    Destroy {
        wrapper: String,
    },
}

impl Op {
    fn object(&self) -> Option<DemoType> {
        match self {
            Op::Add { object, .. }
            | Op::Remove { object, .. }
            | Op::Take { object, .. }
            | Op::TakeAll { object, .. }
            | Op::Shift { object, .. }
            | Op::Split { object, .. }
            | Op::SplitWithIndex { object, .. }
            | Op::SplitWithId { object, .. }
            | Op::Merge { object, .. } => Some(*object),
            Op::New { .. } | Op::SetAlias { .. } | Op::Destroy { .. } => None,
        }
    }
}

/// State of one named wrapper after replay
#[derive(Debug, Clone, Serialize)]
pub struct WrapperReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub identity: Identity,
    pub alias: String,
    pub kind: String,
    pub count: usize,
    pub members: Vec<MemberReport>,
}

/// A member in physical order: a payload, or a nested wrapper
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MemberReport {
    Payload(u64),
    Wrapper(WrapperReport),
}

/// An object that left every wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LooseObject {
    pub object: DemoType,
    pub payload: u64,
}

/// Outcome of a full replay
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub steps: usize,
    pub wrappers: Vec<WrapperReport>,
    pub loose: Vec<LooseObject>,
}

impl Scenario {
    /// Parse a scenario document
    pub fn from_json(input: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Replay every step against `store`.
    ///
    /// Named wrappers still alive at the end are reported, then drained and
    /// destroyed so the store is left empty.
    pub fn run<S: IdentityStore>(&self, store: &mut S) -> Result<ScenarioReport, ScenarioError> {
        let mut session = Session::default();
        for (idx, op) in self.steps.iter().enumerate() {
            let step = idx + 1;
            debug!(step, ?op, "applying step");
            let outcome = session.apply(store, step, op);
            if let Err(err) = outcome {
                session.teardown(store);
                return Err(err);
            }
        }

        let wrappers = session
            .wrappers
            .iter()
            .map(|(name, wrapper)| {
                let mut report = describe(store, wrapper);
                report.name = Some(name.clone());
                report
            })
            .collect();
        let report = ScenarioReport {
            steps: self.steps.len(),
            wrappers,
            loose: std::mem::take(&mut session.loose),
        };
        session.teardown(store);
        info!(steps = report.steps, wrappers = report.wrappers.len(), "scenario complete");
        Ok(report)
    }
}

#[derive(Default)]
struct Session {
    wrappers: BTreeMap<String, Wrapper>,
    loose: Vec<LooseObject>,
}

impl Session {
    fn apply<S: IdentityStore>(
        &mut self,
        store: &mut S,
        step: usize,
        op: &Op,
    ) -> Result<(), ScenarioError> {
        match op.object() {
            Some(DemoType::Ticket) => self.apply_typed::<Ticket, S>(store, step, op),
            Some(DemoType::Badge) => self.apply_typed::<Badge, S>(store, step, op),
            None => self.apply_untyped(store, step, op),
        }
    }

    fn apply_untyped<S: IdentityStore>(
        &mut self,
        store: &mut S,
        step: usize,
        op: &Op,
    ) -> Result<(), ScenarioError> {
        match op {
            Op::New { wrapper, alias } => {
                self.ensure_free(step, wrapper)?;
                let mut created = Wrapper::new(store);
                if let Some(alias) = alias {
                    created.set_alias(store, alias.as_str()).map_err(at(step))?;
                }
                self.wrappers.insert(wrapper.clone(), created);
            }
            Op::SetAlias { wrapper, alias } => {
                let target = self.wrapper_mut(step, wrapper)?;
                target.set_alias(store, alias.as_str()).map_err(at(step))?;
            }
            Op::Destroy { wrapper } => {
                let target = self.detach(step, wrapper)?;
                if let Err(rejected) = target.destroy_empty(store) {
                    let (target, error) = rejected.into_parts();
                    self.wrappers.insert(wrapper.clone(), target);
                    return Err(at(step)(error));
                }
            }
            _ => unreachable!("typed operation dispatched as untyped"),
        }
        Ok(())
    }

    fn apply_typed<T: DemoObject, S: IdentityStore>(
        &mut self,
        store: &mut S,
        step: usize,
        op: &Op,
    ) -> Result<(), ScenarioError> {
        match op {
            Op::Add {
                wrapper, payload, ..
            } => {
                let target = self.wrapper_mut(step, wrapper)?;
                let object = T::mint(store, *payload);
                target
                    .add(store, object)
                    .map_err(|rejected| at(step)(rejected.into()))?;
            }
            Op::Remove { wrapper, index, .. } => {
                let target = self.wrapper_mut(step, wrapper)?;
                let object: T = target.remove(store, *index).map_err(at(step))?;
                self.release(object);
            }
            Op::Take {
                wrapper, payload, ..
            } => {
                let target = self.wrapper_ref(step, wrapper)?;
                let id = find_by_payload::<T, S>(store, target, *payload).ok_or_else(|| {
                    ScenarioError::NoSuchPayload {
                        step,
                        wrapper: wrapper.clone(),
                        object: T::TYPE,
                        payload: *payload,
                    }
                })?;
                let target = self.wrapper_mut(step, wrapper)?;
                let object: T = target.take(store, id).map_err(at(step))?;
                self.release(object);
            }
            Op::TakeAll { wrapper, .. } => {
                let target = self.wrapper_mut(step, wrapper)?;
                let objects: Vec<T> = target.take_all(store).map_err(at(step))?;
                for object in objects {
                    self.release(object);
                }
            }
            Op::Shift { from, to, .. } => {
                let (mut source, mut dest) = self.detach_pair(step, from, to)?;
                let outcome = shift::<T, S>(store, &mut source, &mut dest);
                self.wrappers.insert(from.clone(), source);
                self.wrappers.insert(to.clone(), dest);
                outcome.map_err(at(step))?;
            }
            Op::Split {
                wrapper,
                into,
                count,
                ..
            } => {
                self.ensure_free(step, into)?;
                let source = self.wrapper_mut(step, wrapper)?;
                let part = split::<T, S>(store, source, *count).map_err(at(step))?;
                self.wrappers.insert(into.clone(), part);
            }
            Op::SplitWithIndex {
                wrapper,
                into,
                indices,
                ..
            } => {
                self.ensure_free(step, into)?;
                let source = self.wrapper_mut(step, wrapper)?;
                let part = split_with_index::<T, S>(store, source, indices.clone())
                    .map_err(at(step))?;
                self.wrappers.insert(into.clone(), part);
            }
            Op::SplitWithId {
                wrapper,
                into,
                payloads,
                ..
            } => {
                self.ensure_free(step, into)?;
                let source = self.wrapper_ref(step, wrapper)?;
                let mut ids = Vec::with_capacity(payloads.len());
                for &payload in payloads {
                    let id = find_by_payload::<T, S>(store, source, payload).ok_or_else(|| {
                        ScenarioError::NoSuchPayload {
                            step,
                            wrapper: wrapper.clone(),
                            object: T::TYPE,
                            payload,
                        }
                    })?;
                    ids.push(id);
                }
                let source = self.wrapper_mut(step, wrapper)?;
                let part = split_with_id::<T, S>(store, source, ids).map_err(at(step))?;
                self.wrappers.insert(into.clone(), part);
            }
            Op::Merge {
                first,
                second,
                into,
                ..
            } => {
                if into != first && into != second {
                    self.ensure_free(step, into)?;
                }
                let (w1, w2) = self.detach_pair(step, first, second)?;
                match merge::<T, S>(store, w1, w2) {
                    Ok(merged) => {
                        self.wrappers.insert(into.clone(), merged);
                    }
                    Err(rejected) => {
                        let ((w1, w2), error) = rejected.into_parts();
                        self.wrappers.insert(first.clone(), w1);
                        self.wrappers.insert(second.clone(), w2);
                        return Err(at(step)(error));
                    }
                }
            }
            Op::New { .. } | Op::SetAlias { .. } | Op::Destroy { .. } => {
                unreachable!("untyped operation dispatched as typed")
            }
        }
        Ok(())
    }

    fn release<T: DemoObject>(&mut self, object: T) {
        self.loose.push(LooseObject {
            object: T::TYPE,
            payload: object.payload(),
        });
    }

    fn ensure_free(&self, step: usize, name: &str) -> Result<(), ScenarioError> {
        if self.wrappers.contains_key(name) {
            return Err(ScenarioError::NameTaken {
                step,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn wrapper_ref(&self, step: usize, name: &str) -> Result<&Wrapper, ScenarioError> {
        self.wrappers
            .get(name)
            .ok_or_else(|| unknown(step, name))
    }

    fn wrapper_mut(&mut self, step: usize, name: &str) -> Result<&mut Wrapper, ScenarioError> {
        self.wrappers
            .get_mut(name)
            .ok_or_else(|| unknown(step, name))
    }

    fn detach(&mut self, step: usize, name: &str) -> Result<Wrapper, ScenarioError> {
        self.wrappers
            .remove(name)
            .ok_or_else(|| unknown(step, name))
    }

    fn detach_pair(
        &mut self,
        step: usize,
        first: &str,
        second: &str,
    ) -> Result<(Wrapper, Wrapper), ScenarioError> {
        if first == second {
            return Err(ScenarioError::SameWrapper {
                step,
                name: first.to_string(),
            });
        }
        if !self.wrappers.contains_key(second) {
            return Err(unknown(step, second));
        }
        let w1 = self.detach(step, first)?;
        let w2 = self.detach(step, second)?;
        Ok((w1, w2))
    }

    /// Drain and destroy every named wrapper, nested ones included.
    fn teardown<S: IdentityStore>(&mut self, store: &mut S) {
        let wrappers = std::mem::take(&mut self.wrappers);
        for (name, wrapper) in wrappers {
            if let Err(error) = dispose(store, wrapper) {
                debug!(%name, %error, "wrapper left in store");
            }
        }
    }
}

fn dispose<S: IdentityStore>(store: &mut S, mut wrapper: Wrapper) -> Result<(), WrapError> {
    let kind = wrapper.kind().clone();
    if kind.matches::<Ticket>() {
        let _: Vec<Ticket> = wrapper.take_all(store)?;
    } else if kind.matches::<Badge>() {
        let _: Vec<Badge> = wrapper.take_all(store)?;
    } else if kind.is_nested() {
        for inner in wrapper.take_all::<Wrapper, S>(store)? {
            dispose(store, inner)?;
        }
    }
    wrapper.destroy_empty(store).map_err(WrapError::from)
}

fn find_by_payload<T: DemoObject, S: IdentityStore>(
    store: &S,
    wrapper: &Wrapper,
    payload: u64,
) -> Option<Identity> {
    wrapper.items().iter().copied().find(|&id| {
        store
            .get::<T>(wrapper.identity(), id)
            .map(|object| object.payload() == payload)
            .unwrap_or(false)
    })
}

/// Describe a wrapper and, recursively, any wrappers nested in it
pub fn describe<S: IdentityStore>(store: &S, wrapper: &Wrapper) -> WrapperReport {
    let kind = wrapper.kind();
    let members = if kind.matches::<Ticket>() {
        payloads::<Ticket, S>(store, wrapper)
    } else if kind.matches::<Badge>() {
        payloads::<Badge, S>(store, wrapper)
    } else if kind.is_nested() {
        (0..wrapper.count())
            .filter_map(|idx| wrapper.borrow::<Wrapper, S>(store, idx).ok())
            .map(|inner| MemberReport::Wrapper(describe(store, inner)))
            .collect()
    } else {
        Vec::new()
    };

    WrapperReport {
        name: None,
        identity: wrapper.identity(),
        alias: wrapper.alias().to_string(),
        kind: kind.to_string(),
        count: wrapper.count(),
        members,
    }
}

fn payloads<T: DemoObject, S: IdentityStore>(store: &S, wrapper: &Wrapper) -> Vec<MemberReport> {
    (0..wrapper.count())
        .filter_map(|idx| wrapper.borrow::<T, S>(store, idx).ok())
        .map(|object| MemberReport::Payload(object.payload()))
        .collect()
}

fn at(step: usize) -> impl Fn(WrapError) -> ScenarioError {
    move |source| ScenarioError::Step { step, source }
}

fn unknown(step: usize, name: &str) -> ScenarioError {
    ScenarioError::UnknownWrapper {
        step,
        name: name.to_string(),
    }
}
