use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Function, Lua, MultiValue, Table, Value};

use super::values::render_args;
use crate::app::domain::output::{OutputKind, OutputSink};

/// The four console channels a script can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Log,
    Info,
    Warn,
    Error,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Log, Channel::Info, Channel::Warn, Channel::Error];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Log => "log",
            Channel::Info => "info",
            Channel::Warn => "warn",
            Channel::Error => "error",
        }
    }

    pub fn kind(self) -> OutputKind {
        match self {
            Channel::Log | Channel::Info => OutputKind::Info,
            Channel::Warn => OutputKind::Warning,
            Channel::Error => OutputKind::Error,
        }
    }
}

/// Handle on a `console` table.
///
/// The shim borrows channels through this handle instead of reaching into
/// process-wide state, so two sandboxes never see each other's wrappers.
#[derive(Debug, Clone)]
pub struct ConsoleChannels {
    table: Table,
}

impl ConsoleChannels {
    /// A `console` table whose channels forward to `tracing` under the
    /// `script` target.
    pub fn with_host_logging(lua: &Lua) -> mlua::Result<Self> {
        let table = lua.create_table()?;
        for channel in Channel::ALL {
            let host = lua.create_function(move |_, args: MultiValue| {
                let line = render_args(&args);
                match channel {
                    Channel::Log | Channel::Info => tracing::info!(target: "script", "{}", line),
                    Channel::Warn => tracing::warn!(target: "script", "{}", line),
                    Channel::Error => tracing::error!(target: "script", "{}", line),
                }
                Ok(())
            })?;
            table.raw_set(channel.name(), host)?;
        }
        lock_metatable(lua, &table)?;
        Ok(Self { table })
    }

    pub fn from_table(table: Table) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The function currently bound to `channel`, if it is a function at all.
    /// Reads bypass metamethods.
    pub fn get(&self, channel: Channel) -> Option<Function> {
        match self.table.raw_get::<Value>(channel.name()) {
            Ok(Value::Function(f)) => Some(f),
            _ => None,
        }
    }

    fn bind(&self, channel: Channel, function: Function) -> mlua::Result<()> {
        self.table.raw_set(channel.name(), function)
    }
}

/// Give `table` a protected metatable so scripts cannot swap in
/// `__index`/`__newindex` handlers with `setmetatable`.
fn lock_metatable(lua: &Lua, table: &Table) -> mlua::Result<()> {
    let meta = lua.create_table()?;
    meta.raw_set("__metatable", "locked")?;
    table.set_metatable(Some(meta));
    Ok(())
}

/// Redirects console channels into an [`OutputSink`] for one run.
pub struct CaptureShim {
    sink: Rc<RefCell<OutputSink>>,
    saved: Option<Vec<(Channel, Function)>>,
}

impl CaptureShim {
    pub fn new(sink: Rc<RefCell<OutputSink>>) -> Self {
        Self { sink, saved: None }
    }

    pub fn is_installed(&self) -> bool {
        self.saved.is_some()
    }

    /// Wrap every available channel. A second install before `uninstall`
    /// does nothing, so wrappers never wrap wrappers.
    pub fn install(&mut self, lua: &Lua, channels: &ConsoleChannels) {
        if self.saved.is_some() {
            return;
        }

        let mut saved = Vec::with_capacity(Channel::ALL.len());
        for channel in Channel::ALL {
            let Some(original) = channels.get(channel) else {
                tracing::debug!(channel = channel.name(), "console channel missing, not captured");
                continue;
            };

            let sink = self.sink.clone();
            let passthrough = original.clone();
            let wrapper = lua.create_function(move |_, args: MultiValue| {
                let line = format!("[{}] {}", channel.name(), render_args(&args));
                sink.borrow_mut().append(channel.kind(), line);
                passthrough.call::<()>(args)
            });

            let bound = wrapper.and_then(|w| channels.bind(channel, w));
            match bound {
                Ok(()) => saved.push((channel, original)),
                Err(e) => {
                    tracing::warn!(channel = channel.name(), error = %e, "failed to capture console channel");
                }
            }
        }
        self.saved = Some(saved);
    }

    /// Put back exactly the functions seen at install time.
    pub fn uninstall(&mut self, channels: &ConsoleChannels) {
        let Some(saved) = self.saved.take() else {
            return;
        };
        for (channel, original) in saved {
            if let Err(e) = channels.bind(channel, original) {
                tracing::warn!(channel = channel.name(), error = %e, "failed to restore console channel");
            }
        }
    }
}

/// Keeps the shim installed for its lifetime; uninstalls on drop, including
/// while unwinding.
pub struct ShimGuard<'a> {
    shim: &'a mut CaptureShim,
    channels: &'a ConsoleChannels,
}

impl<'a> ShimGuard<'a> {
    pub fn install(shim: &'a mut CaptureShim, lua: &Lua, channels: &'a ConsoleChannels) -> Self {
        shim.install(lua, channels);
        Self { shim, channels }
    }
}

impl Drop for ShimGuard<'_> {
    fn drop(&mut self) {
        self.shim.uninstall(self.channels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Lua, ConsoleChannels, Rc<RefCell<OutputSink>>) {
        let lua = Lua::new();
        let channels = ConsoleChannels::with_host_logging(&lua).unwrap();
        lua.globals().set("console", channels.table().clone()).unwrap();
        (lua, channels, Rc::new(RefCell::new(OutputSink::new())))
    }

    fn texts(sink: &Rc<RefCell<OutputSink>>) -> Vec<String> {
        sink.borrow().all().iter().map(|e| e.text.clone()).collect()
    }

    #[test]
    fn test_captures_each_channel_with_tag_and_kind() {
        let (lua, channels, sink) = setup();
        let mut shim = CaptureShim::new(sink.clone());
        shim.install(&lua, &channels);
        lua.load("console.log('a', 1); console.info('b'); console.warn('c'); console.error('d')")
            .exec()
            .unwrap();
        shim.uninstall(&channels);

        assert_eq!(texts(&sink), vec!["[log] a 1", "[info] b", "[warn] c", "[error] d"]);
        let kinds: Vec<OutputKind> = sink.borrow().all().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![OutputKind::Info, OutputKind::Info, OutputKind::Warning, OutputKind::Error]
        );
    }

    #[test]
    fn test_uninstall_restores_original_functions() {
        let (lua, channels, sink) = setup();
        let before = channels.get(Channel::Log).unwrap();
        let mut shim = CaptureShim::new(sink.clone());

        shim.install(&lua, &channels);
        assert_ne!(channels.get(Channel::Log).unwrap(), before);
        shim.uninstall(&channels);
        assert_eq!(channels.get(Channel::Log).unwrap(), before);

        lua.load("console.log('not captured')").exec().unwrap();
        assert!(sink.borrow().is_empty());
    }

    #[test]
    fn test_double_install_does_not_double_wrap() {
        let (lua, channels, sink) = setup();
        let before = channels.get(Channel::Warn).unwrap();
        let mut shim = CaptureShim::new(sink.clone());

        shim.install(&lua, &channels);
        shim.install(&lua, &channels);
        lua.load("console.warn('once')").exec().unwrap();
        assert_eq!(texts(&sink), vec!["[warn] once"]);

        shim.uninstall(&channels);
        shim.uninstall(&channels);
        assert_eq!(channels.get(Channel::Warn).unwrap(), before);
        assert!(!shim.is_installed());
    }

    #[test]
    fn test_repeated_cycles_do_not_leak_wrappers() {
        let (lua, channels, sink) = setup();
        let mut shim = CaptureShim::new(sink.clone());
        for _ in 0..3 {
            shim.install(&lua, &channels);
            shim.uninstall(&channels);
        }
        shim.install(&lua, &channels);
        lua.load("console.log('x')").exec().unwrap();
        shim.uninstall(&channels);
        assert_eq!(texts(&sink), vec!["[log] x"]);
    }

    #[test]
    fn test_missing_channel_is_skipped() {
        let (lua, channels, sink) = setup();
        channels.table().set("info", Value::Nil).unwrap();
        let mut shim = CaptureShim::new(sink.clone());
        shim.install(&lua, &channels);
        assert!(channels.get(Channel::Info).is_none());
        lua.load("console.log('still works')").exec().unwrap();
        shim.uninstall(&channels);
        assert_eq!(texts(&sink), vec!["[log] still works"]);
        assert!(channels.get(Channel::Info).is_none());
    }

    #[test]
    fn test_guard_uninstalls_on_drop() {
        let (lua, channels, sink) = setup();
        let before = channels.get(Channel::Error).unwrap();
        let mut shim = CaptureShim::new(sink);
        {
            let _guard = ShimGuard::install(&mut shim, &lua, &channels);
            assert_ne!(channels.get(Channel::Error).unwrap(), before);
        }
        assert_eq!(channels.get(Channel::Error).unwrap(), before);
        assert!(!shim.is_installed());
    }

    #[test]
    fn test_console_metatable_is_protected() {
        let (lua, _channels, _sink) = setup();
        let err = lua
            .load("setmetatable(console, { __newindex = function() end })")
            .exec()
            .unwrap_err();
        assert!(err.to_string().contains("protected metatable"), "{}", err);
        let meta: String = lua.load("return getmetatable(console)").eval().unwrap();
        assert_eq!(meta, "locked");
    }

    #[test]
    fn test_uninstall_bypasses_metamethods() {
        let lua = Lua::new();
        let table = lua.create_table().unwrap();
        for channel in Channel::ALL {
            let f = lua.create_function(|_, ()| Ok(())).unwrap();
            table.raw_set(channel.name(), f).unwrap();
        }
        // An unprotected table whose writes are swallowed by __newindex
        let meta: Table = lua
            .load("return { __newindex = function() end, __index = function() end }")
            .eval()
            .unwrap();
        table.set_metatable(Some(meta));
        let channels = ConsoleChannels::from_table(table);
        let before = channels.get(Channel::Log).unwrap();

        let sink = Rc::new(RefCell::new(OutputSink::new()));
        let mut shim = CaptureShim::new(sink);
        shim.install(&lua, &channels);
        assert_ne!(channels.get(Channel::Log).unwrap(), before);
        channels.table().raw_set("log", Value::Nil).unwrap();
        shim.uninstall(&channels);
        assert_eq!(channels.get(Channel::Log).unwrap(), before);
    }

    #[test]
    fn test_table_arguments_render_as_json() {
        let (lua, channels, sink) = setup();
        let mut shim = CaptureShim::new(sink.clone());
        shim.install(&lua, &channels);
        lua.load("console.log('cfg', { debug = true })").exec().unwrap();
        shim.uninstall(&channels);
        assert_eq!(texts(&sink), vec!["[log] cfg {\n  \"debug\": true\n}"]);
    }
}
