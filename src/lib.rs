//! ScriptPad core: a sandboxed Lua runner with captured console output and a
//! linear undo history for the document being edited.

pub mod app;
