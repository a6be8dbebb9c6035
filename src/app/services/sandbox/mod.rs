//! Script execution sandbox.
//!
//! # Architecture Notes
//!
//! One Lua state lives as long as the sandbox. Each run evaluates the document
//! in a fresh environment table that falls back to the sandbox globals, so
//! script globals never survive into the next run while `string`, `math`,
//! `console` and friends stay reachable.
//!
//! Output flows only through the shared [`OutputSink`]. The console wrappers
//! hold the sink, never the sandbox, and `run` takes `&mut self`, so a script
//! cannot re-enter `run`.
//!
//! There is no timeout: a script that never returns blocks the caller.

pub mod capture;
pub mod values;

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Instant;

use mlua::{Function, Lua, MultiValue, Value};
use tracing::{info, warn};

use crate::app::domain::document::Document;
use crate::app::domain::language;
use crate::app::domain::output::{OutputKind, OutputSink};
use crate::app::infrastructure::error::Result;
use capture::{CaptureShim, ConsoleChannels, ShimGuard};

/// Chunk name used in Lua error locations.
const CHUNK_NAME: &str = "=script";

/// Globals removed before any script runs.
const REMOVED_GLOBALS: &[&str] = &[
    "os", "io", "debug", "package", "require", "loadfile", "dofile", "load",
];

pub struct ExecutionSandbox {
    lua: Lua,
    channels: ConsoleChannels,
    print: Function,
    shim: CaptureShim,
    sink: Rc<RefCell<OutputSink>>,
}

impl ExecutionSandbox {
    /// Create a sandbox writing into `sink`.
    pub fn new(sink: Rc<RefCell<OutputSink>>) -> Result<Self> {
        let lua = Lua::new();
        let channels = ConsoleChannels::with_host_logging(&lua)?;

        let globals = lua.globals();
        for name in REMOVED_GLOBALS {
            globals.raw_set(*name, Value::Nil)?;
        }
        // print() is looked up through console at call time so it is captured too
        let print: Function = lua
            .load("return function(...) return console.log(...) end")
            .set_name("=prelude")
            .eval()?;

        let sandbox = Self {
            lua,
            channels,
            print,
            shim: CaptureShim::new(sink.clone()),
            sink,
        };
        sandbox.bind_globals()?;
        Ok(sandbox)
    }

    /// (Re)bind `console` and `print` in the shared globals. Scripts can
    /// reach those through `_G`, so this runs before every execution.
    fn bind_globals(&self) -> mlua::Result<()> {
        let globals = self.lua.globals();
        globals.raw_set("console", self.channels.table().clone())?;
        globals.raw_set("print", self.print.clone())
    }

    pub fn sink(&self) -> Rc<RefCell<OutputSink>> {
        self.sink.clone()
    }

    pub fn channels(&self) -> &ConsoleChannels {
        &self.channels
    }

    pub fn is_capturing(&self) -> bool {
        self.shim.is_installed()
    }

    /// Run `document`, reporting everything through the sink.
    ///
    /// Never fails: unsupported languages, syntax errors, runtime errors and
    /// host panics all end up as console entries.
    pub fn run(&mut self, document: &Document) {
        self.sink.borrow_mut().clear();

        if !document.is_executable() {
            self.sink.borrow_mut().system(format!(
                "Running {} code requires a server environment. Only {} can be executed here.",
                language::display_name(&document.language),
                language::display_name(language::EXECUTABLE_LANGUAGE),
            ));
            return;
        }

        if let Err(e) = self.bind_globals() {
            warn!(error = %e, "Failed to rebind console globals");
        }
        info!(bytes = document.text.len(), "Starting script run");
        self.sink.borrow_mut().system("Executing Lua...");
        let started = Instant::now();

        {
            let _guard = ShimGuard::install(&mut self.shim, &self.lua, &self.channels);
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| evaluate(&self.lua, &document.text)));

            let mut sink = self.sink.borrow_mut();
            match outcome {
                Ok(Ok(returned)) => {
                    if returned.iter().any(|v| !matches!(v, Value::Nil)) {
                        let parts: Vec<String> = returned.iter().map(values::render_value).collect();
                        sink.append(OutputKind::Info, format!("[return] {}", parts.join(", ")));
                    }
                }
                Ok(Err(e)) => {
                    let message = values::failure_message(&e);
                    warn!(error = %message, "Script failed");
                    sink.error(message);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(error = %message, "Script host panicked");
                    sink.error(format!("script host panicked: {}", message));
                }
            }
        }

        let elapsed_ms = round_ms(started.elapsed().as_secs_f64() * 1000.0);
        info!(elapsed_ms, "Script run complete");
        self.sink
            .borrow_mut()
            .system(format!("Execution completed in {}ms", elapsed_ms));
    }
}

/// The one place document text is executed.
fn evaluate(lua: &Lua, source: &str) -> mlua::Result<MultiValue> {
    let env = lua.create_table()?;
    let meta = lua.create_table()?;
    meta.set("__index", lua.globals())?;
    env.set_metatable(Some(meta));

    lua.load(source)
        .set_name(CHUNK_NAME)
        .set_environment(env)
        .eval::<MultiValue>()
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
