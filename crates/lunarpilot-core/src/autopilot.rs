//! The autopilot sandbox boundary.
//!
//! Autopilot logic is untrusted: it may panic, return garbage, or return a
//! structurally wrong value. The engine never trusts a field before the
//! validation pipeline here has passed it:
//!
//! - hard checks (reject the whole call): return value is an object;
//!   `rotThrust`/`aftThrust` present, numeric and finite; `userStore`
//!   present and an object
//! - soft checks (keep the call, report a fault): thrust values outside
//!   the permitted throttle bands are snapped to the nearest band edge
//!
//! A rejected call zeroes thrust for the tick and discards the user store;
//! the run itself always continues.

use lunarpilot_logic::throttle::ThrottleBands;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Opaque per-run storage owned by the autopilot across calls. Passed in
/// by value each call and replaced wholesale by the returned one.
pub type UserStore = serde_json::Map<String, Value>;

/// The fixed argument contract for one control tick.
pub struct AutopilotArgs<'a> {
    pub x_position: f64,
    /// Height over the terrain point below the lander.
    pub altitude: f64,
    /// Lander tilt in degrees, `(-180, 180]`.
    pub angle: f64,
    /// The store returned by the previous call (empty on the first call
    /// and after any rejected call).
    pub user_store: UserStore,
    pub log: &'a mut LogSink,
    pub plot: &'a mut PlotSink,
}

/// User-supplied control logic, consulted once per control tick.
///
/// The raw JSON return models the untrusted boundary: the sandbox
/// validates its shape before any field reaches the physics loop.
pub trait Autopilot {
    fn control(&mut self, args: AutopilotArgs<'_>) -> Value;
}

impl<F> Autopilot for F
where
    F: for<'a> FnMut(AutopilotArgs<'a>) -> Value,
{
    fn control(&mut self, args: AutopilotArgs<'_>) -> Value {
        self(args)
    }
}

/// Why a control tick's return value was rejected or adjusted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    #[error("{0} missing from return object")]
    MissingField(&'static str),
    #[error("{0} is not a number")]
    NotANumber(&'static str),
    #[error("{0} is not finite")]
    NonFinite(&'static str),
    #[error("{0} is not an object")]
    NotAnObject(&'static str),
    #[error("{field} clipped to {value:.2}")]
    Clipped { field: &'static str, value: f64 },
    #[error("autopilot panicked: {0}")]
    Panicked(String),
}

/// A validated, clamped control command ready for the physics loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlCommand {
    pub rot_thrust: f64,
    pub aft_thrust: f64,
    pub user_store: UserStore,
}

/// Outcome of one sandboxed autopilot call.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlVerdict {
    /// The command is usable. `clipped` lists any snap-to-limits faults;
    /// the command already carries the clamped values.
    Accepted {
        command: ControlCommand,
        clipped: Vec<Fault>,
    },
    /// The call failed a hard check or panicked; coast with zero thrust
    /// and a fresh store this tick.
    Rejected(Fault),
}

fn numeric_field(obj: &UserStore, key: &'static str) -> Result<f64, Fault> {
    let value = obj.get(key).ok_or(Fault::MissingField(key))?;
    let number = value.as_f64().ok_or(Fault::NotANumber(key))?;
    if !number.is_finite() {
        return Err(Fault::NonFinite(key));
    }
    Ok(number)
}

fn validate(raw: &Value, aft: &ThrottleBands, rot: &ThrottleBands) -> Result<ControlVerdict, Fault> {
    let obj = raw.as_object().ok_or(Fault::NotAnObject("return value"))?;

    // Hard checks
    let rot_thrust = numeric_field(obj, "rotThrust")?;
    let aft_thrust = numeric_field(obj, "aftThrust")?;
    let user_store = match obj.get("userStore") {
        None => return Err(Fault::MissingField("userStore")),
        Some(Value::Object(store)) => store.clone(),
        Some(_) => return Err(Fault::NotAnObject("userStore")),
    };

    // Soft checks
    let mut clipped = Vec::new();
    let aft_snap = aft.snap(aft_thrust);
    if aft_snap.clipped {
        clipped.push(Fault::Clipped {
            field: "aftThrust",
            value: aft_snap.value,
        });
    }
    let rot_snap = rot.snap(rot_thrust);
    if rot_snap.clipped {
        clipped.push(Fault::Clipped {
            field: "rotThrust",
            value: rot_snap.value,
        });
    }

    Ok(ControlVerdict::Accepted {
        command: ControlCommand {
            rot_thrust: rot_snap.value,
            aft_thrust: aft_snap.value,
            user_store,
        },
        clipped,
    })
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run one sandboxed control call: invoke the autopilot, contain panics,
/// validate the return value and clamp thrusts into the permitted bands.
pub fn invoke(
    autopilot: &mut dyn Autopilot,
    args: AutopilotArgs<'_>,
    aft: &ThrottleBands,
    rot: &ThrottleBands,
) -> ControlVerdict {
    let raw = match catch_unwind(AssertUnwindSafe(|| autopilot.control(args))) {
        Ok(value) => value,
        Err(payload) => return ControlVerdict::Rejected(Fault::Panicked(panic_message(payload))),
    };

    match validate(&raw, aft, rot) {
        Ok(verdict) => verdict,
        Err(fault) => ControlVerdict::Rejected(fault),
    }
}

/// Rate-limited sink for user log lines. Accepts one call out of every
/// `interval`; the call index always advances, excess calls are dropped
/// silently.
#[derive(Debug, Clone)]
pub struct LogSink {
    interval: u64,
    call_num: u64,
    entries: Vec<(u64, String)>,
}

impl LogSink {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            call_num: 0,
            entries: Vec::new(),
        }
    }

    pub fn log(&mut self, message: impl Into<String>) {
        if self.call_num % self.interval == 0 {
            self.entries.push((self.call_num, message.into()));
        }
        self.call_num += 1;
    }

    pub fn entries(&self) -> &[(u64, String)] {
        &self.entries
    }
}

/// Rate-limited sink for user plot samples. Each accepted sample gets a
/// `time` series set to its call index.
#[derive(Debug, Clone)]
pub struct PlotSink {
    interval: u64,
    call_num: u64,
    samples: Vec<UserStore>,
}

impl PlotSink {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            call_num: 0,
            samples: Vec::new(),
        }
    }

    pub fn plot(&mut self, mut sample: UserStore) {
        if self.call_num % self.interval == 0 {
            sample.insert("time".to_string(), Value::from(self.call_num));
            self.samples.push(sample);
        }
        self.call_num += 1;
    }

    pub fn samples(&self) -> &[UserStore] {
        &self.samples
    }
}
