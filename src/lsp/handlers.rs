pub(crate) mod code_actions;
pub(crate) mod commands;
pub(crate) mod diagnostics;
