use crate::command::Command;
use crate::error::{Error, Origin, Result};

/// Source of environment variable values.
#[derive(Debug, Clone, Copy)]
pub(crate) enum EnvSource<'e> {
    Process,
    Fixed(&'e [(String, String)]),
}

impl EnvSource<'_> {
    /// Value of `key` when set and non-empty.
    pub(crate) fn get(&self, key: &str) -> Option<String> {
        let value = match self {
            Self::Process => std::env::var(key).ok(),
            Self::Fixed(env) => env
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl Command {
    /// Seed every option in the tree with its declared default.
    pub(crate) fn load_defaults(&mut self) {
        for opt in &mut self.options {
            if opt.load_default() {
                tracing::trace!(command = %self.name, option = %opt.flag(), "default applied");
            }
        }
        for sub in &mut self.subcommands {
            sub.load_defaults();
        }
    }

    /// Overwrite values from bound environment variables across the whole tree.
    pub(crate) fn load_env(&mut self, env: EnvSource<'_>) -> Result<()> {
        self.load_own_env(env)
            .map_err(|e| Error::in_command(&self.name, e))?;
        for sub in &mut self.subcommands {
            sub.load_env(env)
                .map_err(|e| Error::in_command(&self.name, e))?;
        }
        Ok(())
    }

    fn load_own_env(&mut self, env: EnvSource<'_>) -> Result<()> {
        for opt in &mut self.options {
            let key = opt.environment();
            if key.is_empty() {
                continue;
            }
            let Some(raw) = env.get(key) else {
                continue;
            };
            let origin = Origin::Env(key.to_string());
            opt.set_raw(&raw, origin)?;
            tracing::trace!(option = %opt.flag(), "environment applied");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::opt::{Opt, Value};

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_value_counts_as_unset() {
        let vars = env(&[("A", ""), ("B", "x")]);
        let source = EnvSource::Fixed(&vars);
        assert_eq!(source.get("A"), None);
        assert_eq!(source.get("B"), Some("x".to_string()));
        assert_eq!(source.get("C"), None);
    }

    #[test]
    fn environment_overrides_default_in_unreached_commands() {
        let mut root = Command::new("app").subcommand(
            Command::new("db").option(Opt::int("pool").env("POOL").default(4)),
        );
        let vars = env(&[("POOL", "16")]);
        root.load_defaults();
        root.load_env(EnvSource::Fixed(&vars)).unwrap();
        assert_eq!(
            root.subcommands[0].options[0].value(),
            Some(Value::Int(16))
        );
    }

    #[test]
    fn bad_environment_value_names_key_and_command() {
        let mut root = Command::new("app").subcommand(
            Command::new("serve").option(Opt::bool("tls").env("TLS").default(false)),
        );
        let vars = env(&[("TLS", "yes")]);
        let err = root.load_env(EnvSource::Fixed(&vars)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        let msg = err.to_string();
        assert!(msg.starts_with("app: serve: "), "{msg}");
        assert!(msg.contains("environment variable TLS"), "{msg}");
    }
}
