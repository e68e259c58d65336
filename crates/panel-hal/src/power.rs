//! Power rail abstraction
//!
//! A panel's supply set mixes real regulators with plain GPIO enables (for
//! example a DC-DC converter switched by a pin). Both are a [`Regulator`].

use embedded_hal::digital::OutputPin;

/// Switchable power rail
pub trait Regulator {
    /// Error type
    type Error: core::fmt::Debug;

    /// Switch the rail on. Returns once the regulator reports it enabled.
    async fn enable(&mut self) -> Result<(), Self::Error>;

    /// Switch the rail off.
    async fn disable(&mut self) -> Result<(), Self::Error>;
}

impl<T: Regulator> Regulator for &mut T {
    type Error = T::Error;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        T::enable(self).await
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        T::disable(self).await
    }
}

/// Rail switched by an active-high enable pin
pub struct GpioSupply<P> {
    pin: P,
}

impl<P: OutputPin> GpioSupply<P> {
    /// Wrap an enable pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Regulator for GpioSupply<P> {
    type Error = P::Error;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }
}

/// Either a regulator or a GPIO-switched rail, so both fit in one ordered set.
pub enum Supply<R, P> {
    /// Regulator-backed rail
    Regulator(R),
    /// GPIO enable line
    Gpio(GpioSupply<P>),
}

/// Error from a [`Supply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupplyError<R, P> {
    /// Regulator refused the request
    Regulator(R),
    /// Enable pin could not be driven
    Gpio(P),
}

impl<R: core::fmt::Debug, P: core::fmt::Debug> core::fmt::Display for SupplyError<R, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Regulator(e) => write!(f, "regulator error: {e:?}"),
            Self::Gpio(e) => write!(f, "supply enable pin error: {e:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<R: core::fmt::Debug, P: core::fmt::Debug> std::error::Error for SupplyError<R, P> {}

impl<R: Regulator, P: OutputPin> Regulator for Supply<R, P> {
    type Error = SupplyError<R::Error, P::Error>;

    async fn enable(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Regulator(r) => r.enable().await.map_err(SupplyError::Regulator),
            Self::Gpio(g) => g.enable().await.map_err(SupplyError::Gpio),
        }
    }

    async fn disable(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Regulator(r) => r.disable().await.map_err(SupplyError::Regulator),
            Self::Gpio(g) => g.disable().await.map_err(SupplyError::Gpio),
        }
    }
}
