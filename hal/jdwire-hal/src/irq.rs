//! Interrupt control
//!
//! Critical sections are taken by disabling all interrupts. Nesting is not
//! supported by the primitive, so the driver never takes a guard while
//! holding another one.

/// Global interrupt enable/disable
pub trait InterruptControl {
    /// Mask all interrupts
    fn disable(&self);

    /// Unmask all interrupts
    fn enable(&self);
}

/// Scoped critical section
///
/// Interrupts are masked for the lifetime of the guard and unmasked again
/// on every exit path, including early returns.
pub struct IrqGuard<'a, I: InterruptControl + ?Sized> {
    irq: &'a I,
}

impl<'a, I: InterruptControl + ?Sized> IrqGuard<'a, I> {
    /// Mask interrupts until the guard is dropped
    pub fn new(irq: &'a I) -> Self {
        irq.disable();
        Self { irq }
    }
}

impl<I: InterruptControl + ?Sized> Drop for IrqGuard<'_, I> {
    fn drop(&mut self) {
        self.irq.enable();
    }
}

/// [`InterruptControl`] on top of the `critical-section` crate
///
/// Boards whose HAL already provides a critical-section implementation
/// (cortex-m, embassy, `std` on the host) can hand this to the driver.
#[cfg(feature = "critical-section")]
#[derive(Default)]
pub struct CriticalSection {
    state: core::cell::Cell<Option<critical_section::RestoreState>>,
}

#[cfg(feature = "critical-section")]
#[allow(unsafe_code)]
impl InterruptControl for CriticalSection {
    fn disable(&self) {
        // SAFETY: released by the matching `enable`; guards never nest
        let state = unsafe { critical_section::acquire() };
        self.state.set(Some(state));
    }

    fn enable(&self) {
        if let Some(state) = self.state.take() {
            // SAFETY: `state` came from the `acquire` in `disable`
            unsafe { critical_section::release(state) };
        }
    }
}
