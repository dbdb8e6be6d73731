use std::{
    borrow::Cow,
    fmt::{Debug, Display},
};

pub enum Error {
    InvalidField(&'static str),
    Io(std::io::Error),
    MalformedHash(&'static str),
    Rng(rand_core::Error),
    Scrypt(scrypt::Error),
    TaskAborted,
    Toml(toml::de::Error),
    Unencodable(&'static str),
}

impl Error {
    /// The underlying scrypt failure, if this error is one.
    #[must_use]
    pub const fn scrypt_kind(&self) -> Option<scrypt::ErrorKind> {
        match self {
            Self::Scrypt(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField(field) => write!(f, "invalid value for config field `{field}`"),
            Self::Io(e) => Display::fmt(e, f),
            Self::MalformedHash(reason) => write!(f, "malformed password hash: {reason}"),
            Self::Rng(e) => write!(f, "could not generate a salt: {e}"),
            Self::Scrypt(e) => Display::fmt(e, f),
            Self::TaskAborted => f.write_str("the key derivation task was aborted"),
            Self::Toml(e) => write!(f, "could not parse TOML config: {e}"),
            Self::Unencodable(reason) => {
                write!(f, "parameters cannot be stored in a password hash: {reason}")
            }
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Self::Toml(value)
    }
}

impl From<scrypt::Error> for Error {
    fn from(value: scrypt::Error) -> Self {
        Self::Scrypt(value)
    }
}

impl From<rand_core::Error> for Error {
    fn from(value: rand_core::Error) -> Self {
        Self::Rng(value)
    }
}

pub struct Context {
    error: Error,
    context: Option<Cow<'static, str>>,
}

impl Context {
    #[must_use]
    pub const fn error(&self) -> &Error {
        &self.error
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.error)
        } else {
            Display::fmt(&self.error, f)
        }
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self, f)
    }
}

impl std::error::Error for Context {}

impl From<Error> for Context {
    fn from(error: Error) -> Self {
        Self {
            error,
            context: None,
        }
    }
}

pub trait ResultExt<T> {
    fn context<C: Into<Cow<'static, str>>>(self, context: C) -> Result<T, Context>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    fn context<C: Into<Cow<'static, str>>>(self, context: C) -> Result<T, Context> {
        self.map_err(|e| Context {
            error: e.into(),
            context: Some(context.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_prefixes_the_message() {
        let res: Result<(), _> = Err(Error::InvalidField("r"));
        let err = res.context("loading passhash.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "loading passhash.toml: invalid value for config field `r`"
        );
        assert!(matches!(err.error(), Error::InvalidField("r")));
        let bare = Context::from(Error::TaskAborted);
        assert_eq!(format!("{bare:?}"), "the key derivation task was aborted");
    }

    #[test]
    fn scrypt_errors_keep_their_kind() {
        let err = Error::from(scrypt::Error::Cancelled);
        assert_eq!(err.scrypt_kind(), Some(scrypt::ErrorKind::Cancelled));
        assert_eq!(Error::TaskAborted.scrypt_kind(), None);
    }
}
