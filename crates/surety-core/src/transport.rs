//! Collaborators the engine depends on: the model transport and the
//! progress reporter.

/// Sends a composed prompt to a model and returns its raw text response.
///
/// Implementations own the wire protocol, credentials and any per-request
/// timeout. The engine calls [`send`](Transport::send) once per attempt and
/// never retries a transport error.
pub trait Transport {
    /// Connectivity or configuration failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Dispatch `prompt` to `model`, blocking until the response arrives.
    fn send(&self, model: &str, prompt: &str) -> Result<String, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Error = T::Error;

    fn send(&self, model: &str, prompt: &str) -> Result<String, Self::Error> {
        (**self).send(model, prompt)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    type Error = T::Error;

    fn send(&self, model: &str, prompt: &str) -> Result<String, Self::Error> {
        (**self).send(model, prompt)
    }
}

/// Receives human-readable progress notices such as invalid responses.
///
/// Notifying must not fail.
pub trait Reporter: Send + Sync {
    fn notify(&self, message: &str);
}

/// Emits notices as `tracing` warnings. The engine default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "surety::engine", "{message}");
    }
}

/// Discards every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn notify(&self, _message: &str) {}
}

impl<F> Reporter for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}
