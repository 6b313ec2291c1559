//! Interceptor Registry - Type-safe builder for constructing interceptor chains.

use crate::noop::NoopInterceptor;

/// Registry for constructing interceptor chains.
///
/// `Registry` uses a type-state pattern where each call to `.with()`
/// transforms the registry's type parameter, creating a new registry that wraps
/// the current chain with another interceptor.
///
/// # Example
///
/// ```ignore
/// use rtc_interceptor::Registry;
///
/// // Build a chain of interceptors
/// let chain = Registry::new()
///     .with(SenderReportInterceptor::new)
///     .with(ReceiverReportInterceptor::new)
///     .with(|p| NackInterceptor::with_config(p, config))
///     .build();
///
/// // The resulting type is fully known at compile time:
/// // NackInterceptor<ReceiverReportInterceptor<SenderReportInterceptor<NoopInterceptor<...>>>>
/// ```
///
/// # Type Safety
///
/// The builder pattern ensures that interceptor chains are type-safe.
/// Each `.with()` call changes the return type, so the compiler can verify
/// that the chain is properly constructed.
pub struct Registry<P> {
    inner: P,
}

impl Registry<()> {
    /// Start building a new interceptor chain.
    ///
    /// This creates a registry with a `NoopInterceptor` as the innermost layer.
    /// The `NoopInterceptor` serves as a simple pass-through terminal.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let chain = Registry::new()
    ///     .with(MyInterceptor::new)
    ///     .build();
    /// ```
    pub fn new<Rin, Win, Ein>() -> Registry<NoopInterceptor<Rin, Win, Ein>> {
        Registry {
            inner: NoopInterceptor::new(),
        }
    }
}

impl<P> Registry<P> {
    /// Start building from an existing protocol.
    ///
    /// This allows using a custom innermost layer instead of `NoopInterceptor`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let custom_inner = MyCustomProtocol::new();
    /// let chain = Registry::from(custom_inner)
    ///     .with(MyInterceptor::new)
    ///     .build();
    /// ```
    pub fn from(inner: P) -> Self {
        Registry { inner }
    }

    /// Wrap the current chain with another interceptor.
    ///
    /// The wrapper function receives the current chain and returns a new
    /// interceptor that wraps it. This changes the registry's type parameter
    /// to reflect the new outer layer.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let chain = Registry::new()
    ///     .with(SenderReportInterceptor::new)  // Returns Registry<SenderReportInterceptor<...>>
    ///     .with(ReceiverReportInterceptor::new)  // Returns Registry<ReceiverReportInterceptor<...>>
    ///     .build();
    /// ```
    pub fn with<O, F>(self, f: F) -> Registry<O>
    where
        F: FnOnce(P) -> O,
    {
        Registry {
            inner: f(self.inner),
        }
    }

    /// Finish building and return the interceptor chain.
    ///
    /// This consumes the registry and returns the constructed chain.
    pub fn build(self) -> P {
        self.inner
    }
}
