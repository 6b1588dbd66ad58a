//! CLI command binding.

use docwire_core::{Callback, CommandRegistrar, Declaration, HookKind};

/// Forwards command declarations to the host command dispatcher.
pub struct CommandBinder<'h, H: ?Sized> {
    host: &'h H,
}

impl<'h, H: CommandRegistrar + ?Sized> CommandBinder<'h, H> {
    /// Create a binder for `host`.
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Register `callback` as command `name`.
    pub fn bind(&self, name: &str, callback: Callback) {
        tracing::trace!(command = name, method = callback.method(), "add command");
        self.host.register_command(name, callback);
    }

    /// Register a command declaration. Declarations of any other kind are
    /// ignored and `false` is returned.
    pub fn bind_declaration(&self, decl: &Declaration) -> bool {
        if decl.kind() != HookKind::Command {
            return false;
        }
        self.bind(decl.name(), decl.callback().clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;
    use docwire_core::ArgCount;
    use serde_json::{Value, json};

    #[test]
    fn test_binds_commands_only() {
        let host = RecordingHost::new();
        let binder = CommandBinder::new(&host);
        let cb = Callback::new("Cli", "sync", |_| Ok(json!("synced")));

        let command =
            Declaration::new(HookKind::Command, "acme:sync now", 10, ArgCount::Unbounded, cb.clone())
                .unwrap();
        let action = Declaration::new(HookKind::Action, "init", 10, ArgCount::Unbounded, cb).unwrap();

        assert!(binder.bind_declaration(&command));
        assert!(!binder.bind_declaration(&action));

        let commands = host.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].0, "acme:sync now");
        assert_eq!(commands[0].1.call(&[]).unwrap(), json!("synced"));
        assert_ne!(commands[0].1.call(&[]).unwrap(), Value::Null);
    }
}
