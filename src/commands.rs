//! Named actions patches register with the host's command dispatcher.
//!
//! Commands run synchronously; a handler's failure surfaces to the host
//! dispatcher unchanged.

use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::Engine;

/// String arguments attached to a command invocation, `"true"`/`"false"`
/// booleans included.
#[derive(Default)]
pub struct CommandArgs {
    values: HashMap<String, String>,
}

impl CommandArgs {
    pub fn new() -> CommandArgs {
        CommandArgs::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> CommandArgs {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                log::warn!("command argument '{}' is malformed ('{}')", key, other);
                default
            }
        }
    }
}

type CommandFn = Rc<dyn Fn(&mut Engine, &CommandArgs) -> eyre::Result<()>>;

/// (patch name, command name) -> handler.
#[derive(Default)]
pub struct CommandTable {
    handlers: HashMap<(String, String), CommandFn>,
}

impl CommandTable {
    pub fn new() -> CommandTable {
        CommandTable::default()
    }

    pub fn register(
        &mut self,
        patch: &str,
        command: &str,
        handler: impl Fn(&mut Engine, &CommandArgs) -> eyre::Result<()> + 'static,
    ) {
        let key = (patch.to_string(), command.to_string());
        if self.handlers.insert(key, Rc::new(handler)).is_some() {
            log::warn!("patch '{}' re-registered command '{}'", patch, command);
        }
    }

    pub fn dispatch(
        &self,
        engine: &mut Engine,
        patch: &str,
        command: &str,
        args: &CommandArgs,
    ) -> eyre::Result<()> {
        let handler = self
            .handlers
            .get(&(patch.to_string(), command.to_string()))
            .cloned()
            .ok_or_else(|| eyre::eyre!("no command '{}' registered by patch '{}'", command, patch))?;

        handler(engine, args)
    }
}
