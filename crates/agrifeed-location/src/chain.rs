//! "Try in order" composition of fallible async steps.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

type StageFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// One named step of a fallback chain. The step is not started until the
/// chain reaches it.
pub struct Stage<'a, T, E> {
    name: &'static str,
    run: Box<dyn FnOnce() -> StageFuture<'a, T, E> + Send + 'a>,
}

impl<'a, T, E> Stage<'a, T, E> {
    pub fn new<F, Fut>(name: &'static str, run: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T, E>> + Send + 'a,
    {
        Self {
            name,
            run: Box::new(move || Box::pin(run())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A stage that did not produce a value.
#[derive(Debug)]
pub struct StageFailure<E> {
    pub stage: &'static str,
    pub error: E,
}

impl<E: fmt::Display> fmt::Display for StageFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.error)
    }
}

/// Run `stages` in order and return the first success.
///
/// Later stages never start once one succeeds. When every stage fails the
/// failures come back in the order they happened.
pub async fn first_success<T, E: fmt::Display>(
    stages: Vec<Stage<'_, T, E>>,
) -> Result<T, Vec<StageFailure<E>>> {
    let mut failures = Vec::new();

    for stage in stages {
        let name = stage.name;
        match (stage.run)().await {
            Ok(value) => {
                tracing::debug!("Stage '{}' succeeded", name);
                return Ok(value);
            }
            Err(error) => {
                tracing::debug!("Stage '{}' failed: {}", name, error);
                failures.push(StageFailure { stage: name, error });
            }
        }
    }

    Err(failures)
}
