use std::error::Error as StdError;
use std::fmt;

/// A node in the application's error-class hierarchy.
///
/// Classes are declared as `static`s and link to their parent, so the hierarchy is closed
/// at compile time and subtype checks are a walk up the parent chain:
///
/// ```rust
/// use warren::controller::{ErrorClass, RUNTIME_ERROR};
///
/// static RABBIT_ESCAPED: ErrorClass = ErrorClass::extends("RabbitEscaped", &RUNTIME_ERROR);
///
/// assert!(RABBIT_ESCAPED.is_subclass_of(&RUNTIME_ERROR));
/// assert!(!RUNTIME_ERROR.is_subclass_of(&RABBIT_ESCAPED));
/// ```
///
/// A class is identified by its `static`, not its name: two classes with the same name
/// and different parents are unrelated.
#[derive(Debug)]
pub struct ErrorClass {
    name: &'static str,
    parent: Option<&'static ErrorClass>,
}

impl ErrorClass {
    #[must_use]
    pub const fn root(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    #[must_use]
    pub const fn extends(name: &'static str, parent: &'static ErrorClass) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&'static ErrorClass> {
        self.parent
    }

    /// This class followed by each ancestor up to the root
    pub fn lineage(&self) -> impl Iterator<Item = &ErrorClass> {
        std::iter::successors(Some(self), |class| class.parent.map(|p| p as &ErrorClass))
    }

    /// True when `self` is `other` or descends from it.
    #[must_use]
    pub fn is_subclass_of(&self, other: &ErrorClass) -> bool {
        self.lineage().any(|class| std::ptr::eq(class, other))
    }
}

impl PartialEq for ErrorClass {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for ErrorClass {}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Root of every application error class
pub static EXCEPTION: ErrorClass = ErrorClass::root("Exception");
/// Errors only detectable while running (I/O, downstream failures, missing records)
pub static RUNTIME_ERROR: ErrorClass = ErrorClass::extends("RuntimeError", &EXCEPTION);
/// Errors in program logic that should have been caught earlier
pub static LOGIC_ERROR: ErrorClass = ErrorClass::extends("LogicError", &EXCEPTION);
pub static INVALID_ARGUMENT: ErrorClass = ErrorClass::extends("InvalidArgument", &LOGIC_ERROR);
pub static NOT_FOUND: ErrorClass = ErrorClass::extends("NotFound", &RUNTIME_ERROR);

/// Error raised by a controller action or error handler.
pub struct ApplicationError {
    class: &'static ErrorClass,
    message: String,
    source: Option<anyhow::Error>,
}

impl ApplicationError {
    #[must_use]
    pub fn new(class: &'static ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(&RUNTIME_ERROR, message)
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(&INVALID_ARGUMENT, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(&NOT_FOUND, message)
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn class(&self) -> &'static ErrorClass {
        self.class
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when this error's class is `class` or one of its subclasses
    #[must_use]
    pub fn is(&self, class: &ErrorClass) -> bool {
        self.class.is_subclass_of(class)
    }
}

impl fmt::Debug for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationError")
            .field("class", &self.class.name)
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class.name, self.message)
    }
}

impl StdError for ApplicationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|err| {
            let inner: &(dyn StdError + 'static) = err.as_ref();
            inner
        })
    }
}

/// `anyhow` errors surface as runtime errors with their whole context chain as message.
impl From<anyhow::Error> for ApplicationError {
    fn from(err: anyhow::Error) -> Self {
        Self::runtime(format!("{err:#}"))
    }
}
