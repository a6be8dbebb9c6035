use std::ffi::c_void;
use std::sync::LazyLock;

use mlua::{MultiValue, Table, Value};
use regex_lite::Regex;
use serde_json::{Map, Number, Value as Json};

/// Tables nested deeper than this are cut off with [`TRUNCATED`].
pub const MAX_TABLE_DEPTH: usize = 100;

/// Upper bound on table entries visited for one rendered value.
pub const MAX_TABLE_ENTRIES: usize = 10_000;

const TRUNCATED: &str = "[...]";

/// `script:12: ` or `[string "..."]:12: ` at the front of a Lua message.
static LOCATION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:\[string "[^"]*"\]|[A-Za-z0-9_.-]+):\d+: "#).unwrap());

/// Render a Lua value the way the console shows it.
///
/// Tables become two-space indented JSON; everything else uses its natural
/// string form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Number(n) => {
            // Format nicely: no trailing zeros for integers
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{:.0}", n)
            } else {
                format!("{}", n)
            }
        }
        Value::String(s) => String::from_utf8_lossy(&s.as_bytes()).into_owned(),
        Value::Table(t) => {
            let mut walk = TableWalk::default();
            walk.table(t, 0)
                .and_then(|json| serde_json::to_string_pretty(&json).ok())
                .unwrap_or_else(|| "table".to_string())
        }
        Value::Function(_) => "function".to_string(),
        Value::Thread(_) => "thread".to_string(),
        Value::UserData(_) => "userdata".to_string(),
        Value::LightUserData(_) => "lightuserdata".to_string(),
        Value::Error(e) => format!("error: {}", e),
        _ => "<unknown>".to_string(),
    }
}

/// Converts a Lua table to JSON without recursing past [`MAX_TABLE_DEPTH`].
///
/// A table with a non-empty sequence part becomes an array of that sequence;
/// anything else becomes an object keyed by its string and number keys.
/// Cycles and values JSON cannot hold (functions, threads, userdata) give
/// `None`, and the caller falls back to the plain `table` label.
#[derive(Default)]
struct TableWalk {
    path: Vec<*const c_void>,
    visited: usize,
}

impl TableWalk {
    fn table(&mut self, table: &Table, depth: usize) -> Option<Json> {
        if depth >= MAX_TABLE_DEPTH || self.visited >= MAX_TABLE_ENTRIES {
            return Some(Json::String(TRUNCATED.to_string()));
        }
        let ptr = table.to_pointer();
        if self.path.contains(&ptr) {
            return None;
        }
        self.path.push(ptr);
        let json = self.entries(table, depth);
        self.path.pop();
        json
    }

    fn entries(&mut self, table: &Table, depth: usize) -> Option<Json> {
        let len = table.raw_len();
        if len > 0 {
            let mut items = Vec::with_capacity(len.min(MAX_TABLE_ENTRIES));
            for i in 1..=len {
                if self.visited >= MAX_TABLE_ENTRIES {
                    items.push(Json::String(TRUNCATED.to_string()));
                    break;
                }
                self.visited += 1;
                let item: Value = table.raw_get(i).ok()?;
                items.push(self.value(&item, depth)?);
            }
            return Some(Json::Array(items));
        }

        let mut map = Map::new();
        for pair in table.pairs::<Value, Value>() {
            if self.visited >= MAX_TABLE_ENTRIES {
                map.insert(TRUNCATED.to_string(), Json::String(TRUNCATED.to_string()));
                break;
            }
            self.visited += 1;
            let (key, item) = pair.ok()?;
            let key = match key {
                Value::String(_) | Value::Integer(_) | Value::Number(_) => render_value(&key),
                _ => return None,
            };
            map.insert(key, self.value(&item, depth)?);
        }
        Some(Json::Object(map))
    }

    fn value(&mut self, value: &Value, depth: usize) -> Option<Json> {
        match value {
            Value::Nil => Some(Json::Null),
            Value::Boolean(b) => Some(Json::Bool(*b)),
            Value::Integer(i) => Some(Json::from(*i)),
            Value::Number(n) => Some(Number::from_f64(*n).map_or(Json::Null, Json::Number)),
            Value::String(s) => Some(Json::String(
                String::from_utf8_lossy(&s.as_bytes()).into_owned(),
            )),
            Value::Table(t) => self.table(t, depth + 1),
            _ => None,
        }
    }
}

/// Render every argument and join them with single spaces.
pub fn render_args(args: &MultiValue) -> String {
    args.iter().map(render_value).collect::<Vec<_>>().join(" ")
}

/// Human-readable failure text: no chunk location, no stack traceback.
pub fn failure_message(error: &mlua::Error) -> String {
    match error {
        mlua::Error::SyntaxError { message, .. } => strip_location(message),
        mlua::Error::RuntimeError(msg) => strip_location(msg),
        mlua::Error::CallbackError { cause, .. } => failure_message(cause),
        mlua::Error::MemoryError(msg) => msg.clone(),
        other => strip_location(&other.to_string()),
    }
}

fn strip_location(message: &str) -> String {
    let first = message
        .split("\nstack traceback:")
        .next()
        .unwrap_or(message)
        .trim_end();
    LOCATION_PREFIX.replace(first, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;

    fn eval(lua: &Lua, src: &str) -> Value {
        lua.load(src).eval::<Value>().unwrap()
    }

    #[test]
    fn test_render_primitives() {
        let lua = Lua::new();
        assert_eq!(render_value(&eval(&lua, "1 + 1")), "2");
        assert_eq!(render_value(&eval(&lua, "4 / 2")), "2");
        assert_eq!(render_value(&eval(&lua, "1 / 4")), "0.25");
        assert_eq!(render_value(&eval(&lua, "'hi'")), "hi");
        assert_eq!(render_value(&eval(&lua, "true")), "true");
        assert_eq!(render_value(&Value::Nil), "nil");
    }

    #[test]
    fn test_render_table_as_indented_json() {
        let lua = Lua::new();
        let rendered = render_value(&eval(&lua, "{ name = 'ferris' }"));
        assert_eq!(rendered, "{\n  \"name\": \"ferris\"\n}");

        let rendered = render_value(&eval(&lua, "{ 1, 2 }"));
        assert_eq!(rendered, "[\n  1,\n  2\n]");
    }

    #[test]
    fn test_render_unserializable_table_falls_back() {
        let lua = Lua::new();
        let rendered = render_value(&eval(&lua, "{ f = function() end }"));
        assert_eq!(rendered, "table");
    }

    #[test]
    fn test_render_self_referencing_table_falls_back() {
        let lua = Lua::new();
        let rendered = render_value(&eval(&lua, "local t = {} t.me = t return t"));
        assert_eq!(rendered, "table");
    }

    #[test]
    fn test_render_shared_subtable_is_not_a_cycle() {
        let lua = Lua::new();
        let rendered = render_value(&eval(&lua, "local s = { 1 } return { s, s }"));
        assert_eq!(rendered, "[\n  [\n    1\n  ],\n  [\n    1\n  ]\n]");
    }

    #[test]
    fn test_render_deeply_nested_table_is_truncated() {
        let lua = Lua::new();
        let deep = eval(&lua, "local t = {} for i = 1, 200000 do t = { t } end return t");
        let rendered = render_value(&deep);
        assert!(rendered.starts_with('['));
        assert!(rendered.contains("\"[...]\""));
        assert_eq!(rendered.matches('[').count() - 1, MAX_TABLE_DEPTH);
    }

    #[test]
    fn test_render_wide_table_stops_at_entry_budget() {
        let lua = Lua::new();
        let wide = eval(&lua, "local t = {} for i = 1, 20000 do t[i] = i end return t");
        let rendered = render_value(&wide);
        assert!(rendered.ends_with("\"[...]\"\n]"));
        assert!(!rendered.contains("15000"));
    }

    #[test]
    fn test_render_invalid_utf8_keeps_readable_bytes() {
        let lua = Lua::new();
        let s = lua.create_string(b"f\xffo").unwrap();
        assert_eq!(render_value(&Value::String(s)), "f\u{FFFD}o");
    }

    #[test]
    fn test_render_args_joins_with_space() {
        let lua = Lua::new();
        let args = lua.load("return 'a', 1, nil, false").eval::<MultiValue>().unwrap();
        assert_eq!(render_args(&args), "a 1 nil false");
    }

    #[test]
    fn test_failure_message_strips_location_and_traceback() {
        let err = mlua::Error::RuntimeError(
            "script:3: boom\nstack traceback:\n\t[C]: in function 'error'".to_string(),
        );
        assert_eq!(failure_message(&err), "boom");

        let err = mlua::Error::RuntimeError("[string \"x\"]:1: bad".to_string());
        assert_eq!(failure_message(&err), "bad");

        let err = mlua::Error::RuntimeError("plain".to_string());
        assert_eq!(failure_message(&err), "plain");
    }

    #[test]
    fn test_failure_message_from_real_error() {
        let lua = Lua::new();
        let err = lua
            .load("error('boom')")
            .set_name("=script")
            .exec()
            .unwrap_err();
        assert_eq!(failure_message(&err), "boom");
    }
}
