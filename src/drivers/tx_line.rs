//! RF transmit-line driver.
//!
//! Owns the single physical output feeding the 433 MHz OOK stage and
//! exposes it through [`TxLinePort`].  Pulse timing comes from busy-waiting
//! on the ROM microsecond delay; a blocking burst is the accepted cost of
//! keeping the pulse widths inside what the receivers decode.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO and busy-waits.
//! On host/test: tracks the line level in-memory only.

use crate::app::ports::TxLinePort;
use crate::drivers::hw_init;
use crate::pins;

pub struct GpioTxLine {
    level_high: bool,
}

impl GpioTxLine {
    pub fn new() -> Self {
        Self { level_high: false }
    }

    pub fn is_high(&self) -> bool {
        self.level_high
    }
}

impl Default for GpioTxLine {
    fn default() -> Self {
        Self::new()
    }
}

impl TxLinePort for GpioTxLine {
    fn set_line(&mut self, high: bool) {
        hw_init::gpio_write(pins::RF_TX_GPIO, high);
        self.level_high = high;
    }

    #[cfg(target_os = "espidf")]
    fn wait_micros(&mut self, us: u32) {
        // SAFETY: esp_rom_delay_us busy-waits on the cycle counter; safe
        // from the single control task.
        unsafe {
            esp_idf_svc::sys::esp_rom_delay_us(us);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn wait_micros(&mut self, _us: u32) {}
}
