use crate::error::{Context, Error, ResultExt};
use scrypt::{Implementation, Options, Params};
use std::path::Path;

const KNOWN_KEYS: [&str; 6] = ["implementation", "log_n", "max_memory_mb", "p", "r", "threads"];

#[derive(Debug)]
pub struct TomlConfig {
    table: toml::value::Table,
}

impl TomlConfig {
    #[must_use]
    pub fn new(table: toml::value::Table) -> Self {
        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::warn!("ignoring unknown config field `{key}`");
            }
        }
        Self { table }
    }

    fn integer(&self, field: &'static str) -> Result<Option<i64>, Error> {
        match self.table.get(field) {
            None => Ok(None),
            Some(toml::Value::Integer(v)) => Ok(Some(*v)),
            Some(_) => Err(Error::InvalidField(field)),
        }
    }

    fn cost<T: TryFrom<i64>>(&self, field: &'static str, default: T) -> Result<T, Error> {
        self.integer(field)?.map_or(Ok(default), |v| {
            T::try_from(v).map_err(|_| Error::InvalidField(field))
        })
    }

    pub fn log_n(&self) -> Result<u8, Error> {
        self.cost("log_n", Params::default().log_n())
    }

    pub fn r(&self) -> Result<u32, Error> {
        self.cost("r", Params::default().r())
    }

    pub fn p(&self) -> Result<u32, Error> {
        self.cost("p", Params::default().p())
    }

    /// The memory ceiling in bytes. Values that are not positive fall back to
    /// the default.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn max_memory(&self) -> u64 {
        match self.table.get("max_memory_mb") {
            Some(toml::Value::Integer(v)) if *v > 0 => (*v as u64).saturating_mul(1024 * 1024),
            Some(_) => {
                log::warn!("ignoring invalid `max_memory_mb`, using the default");
                scrypt::DEFAULT_MAX_MEMORY
            }
            None => scrypt::DEFAULT_MAX_MEMORY,
        }
    }

    /// `0` or a missing value means one thread per CPU.
    #[must_use]
    pub fn threads(&self) -> usize {
        match self.table.get("threads") {
            Some(toml::Value::Integer(v)) => usize::try_from(*v).unwrap_or_else(|_| {
                log::warn!("ignoring invalid `threads`, using one per CPU");
                0
            }),
            Some(_) => {
                log::warn!("ignoring invalid `threads`, using one per CPU");
                0
            }
            None => 0,
        }
    }

    pub fn implementation(&self) -> Result<Implementation, Error> {
        match self.table.get("implementation") {
            None => Ok(Implementation::Auto),
            Some(toml::Value::String(v)) => match v.as_str() {
                "auto" => Ok(Implementation::Auto),
                "portable" => Ok(Implementation::Portable),
                "native" => Ok(Implementation::Native),
                _ => Err(Error::InvalidField("implementation")),
            },
            Some(_) => Err(Error::InvalidField("implementation")),
        }
    }
}

/// Default cost parameters and derivation limits.
///
/// ```toml
/// log_n = 14             # N = 2^14
/// r = 8
/// p = 1
/// max_memory_mb = 2048
/// threads = 0            # one per CPU
/// implementation = "auto" # or "portable", "native"
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Config {
    params: Params,
    max_memory: u64,
    threads: usize,
    implementation: Implementation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            params: Params::default(),
            max_memory: scrypt::DEFAULT_MAX_MEMORY,
            threads: 0,
            implementation: Implementation::Auto,
        }
    }
}

impl Config {
    pub fn new(t: &TomlConfig) -> Result<Self, Error> {
        Ok(Self {
            params: Params::new(t.log_n()?, t.r()?, t.p()?)?,
            max_memory: t.max_memory(),
            threads: t.threads(),
            implementation: t.implementation()?,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let table = toml::from_str::<toml::value::Table>(s)?;
        Self::new(&TomlConfig::new(table))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Context> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .context(format!("could not read config file {}", path.display()))?;
        let config = Self::from_toml_str(&s).context(format!("in {}", path.display()))?;
        log::debug!("loaded {config:?} from {}", path.display());
        Ok(config)
    }

    #[must_use]
    pub const fn params(&self) -> Params {
        self.params
    }

    #[must_use]
    pub fn options(&self) -> Options {
        Options::new()
            .with_max_memory(self.max_memory)
            .with_threads(self.threads)
            .with_implementation(self.implementation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.params(), Params::default());
        let options = config.options();
        assert_eq!(options.max_memory(), scrypt::DEFAULT_MAX_MEMORY);
        assert_eq!(options.implementation(), Implementation::Auto);
        assert!(options.threads() >= 1);
    }

    #[test]
    fn reads_every_field() {
        let config = Config::from_toml_str(
            r#"
            log_n = 10
            r = 4
            p = 2
            max_memory_mb = 64
            threads = 3
            implementation = "portable"
            "#,
        )
        .unwrap();
        assert_eq!(config.params(), Params::new(10, 4, 2).unwrap());
        let options = config.options();
        assert_eq!(options.max_memory(), 64 * 1024 * 1024);
        assert_eq!(options.threads(), 3);
        assert_eq!(options.implementation(), Implementation::Portable);
    }

    #[test]
    fn lenient_limits() {
        let config =
            Config::from_toml_str("max_memory_mb = -1\nthreads = \"many\"\nfoo = 1").unwrap();
        assert_eq!(config.options().max_memory(), scrypt::DEFAULT_MAX_MEMORY);
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn strict_costs() {
        let err = Config::from_toml_str("r = \"eight\"").unwrap_err();
        assert!(matches!(err, Error::InvalidField("r")));
        let err = Config::from_toml_str("log_n = 300").unwrap_err();
        assert!(matches!(err, Error::InvalidField("log_n")));
        let err = Config::from_toml_str("p = 0").unwrap_err();
        assert_eq!(err.scrypt_kind(), Some(scrypt::ErrorKind::InvalidParameter));
        let err = Config::from_toml_str("implementation = \"gpu\"").unwrap_err();
        assert!(matches!(err, Error::InvalidField("implementation")));
        assert!(matches!(
            Config::from_toml_str("log_n = ").unwrap_err(),
            Error::Toml(_)
        ));
    }

    #[test]
    fn load_adds_the_path() {
        let err = Config::load("/nonexistent/passhash.toml").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("could not read config file /nonexistent/passhash.toml"));
        assert!(matches!(err.error(), Error::Io(_)));
    }
}
