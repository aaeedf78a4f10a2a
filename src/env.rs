use std::{cell::RefCell, env::VarError, ffi::OsStr};

use tracing::warn;

#[derive(Clone, Copy, Debug)]
struct Env {
    max_steps: Var<u64>,
    trace: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Var<T> {
    Unset,
    Set(T),
    Malformed,
}

thread_local! {
    /// Must only be mutated within `set_env`
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

/// Read `LS8_*` variables from the process environment.
pub fn init() {
    let value = Env {
        max_steps: var_parse("LS8_MAX_STEPS"),
        trace: var_is("LS8_TRACE", "1"),
    };
    set_env(value);
}

/// Default step budget, overridden by `--max-steps`.
///
/// A malformed `LS8_MAX_STEPS` is reported here rather than in `init`, which
/// runs before logging is set up.
pub fn max_steps() -> Option<u64> {
    with_env(|env| match env.max_steps {
        Var::Set(limit) => Some(limit),
        Var::Unset => None,
        Var::Malformed => {
            warn!("LS8_MAX_STEPS is not a whole number, running without a step limit");
            None
        }
    })
}

pub fn is_trace_enabled() -> bool {
    with_env(|env| env.trace)
}

fn set_env(value: Env) {
    ENV.with(|env| {
        let mut env = env.borrow_mut();
        assert!(
            env.is_none(),
            "tried to initialize environment state multiple times"
        );
        *env = Some(value);
    });
}

fn with_env<F, R>(callback: F) -> R
where
    F: Fn(&Env) -> R,
{
    ENV.with(|env| {
        let env = env.borrow();
        let env = env.unwrap_or_else(|| {
            panic!("tried to access environment state before initialization");
        });
        callback(&env)
    })
}

fn var_is(name: impl AsRef<OsStr>, value: impl AsRef<str>) -> bool {
    std::env::var(name.as_ref()).is_ok_and(|v| v == value.as_ref())
}

fn var_parse(name: impl AsRef<OsStr>) -> Var<u64> {
    match std::env::var(name.as_ref()) {
        Ok(v) => match v.trim().parse() {
            Ok(n) => Var::Set(n),
            Err(_) => Var::Malformed,
        },
        Err(VarError::NotPresent) => Var::Unset,
        Err(VarError::NotUnicode(_)) => Var::Malformed,
    }
}
