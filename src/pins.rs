//! GPIO pin assignments for the RollerMote bridge board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// 433 MHz transmitter (FS1000A-class ASK/OOK module)
// ---------------------------------------------------------------------------

/// Digital output driving the data pin of the OOK transmit stage.
///
/// The first bridge prototype ran on an ESP-01 and repurposed GPIO 1 (UART
/// TX) for this; the ESP32 board routes a dedicated pin instead.
pub const RF_TX_GPIO: i32 = 4;
