//! Panic handler for the boot menu.
//!
//! A panic may happen between arming and disarming the watchdog, so the watchdog is stopped first. The panic is
//! then shown until a key is pressed, and the system is shut down.
//!
//! This is enabled with the `panic_handler` feature, so frontends may provide their own instead.

#![cfg(feature = "panic_handler")]
use core::{fmt::Write, panic::PanicInfo};

use uefi::{
    Status, boot,
    runtime::{self, ResetType},
    system::{with_stdin, with_stdout},
};

/// How long to show the panic if there is no keyboard, in microseconds.
const NO_INPUT_DELAY: usize = 10_000_000;

/// Waits for a key press, or for [`NO_INPUT_DELAY`] if the console has no input.
fn wait_for_acknowledgment() {
    let event = with_stdin(|stdin| stdin.wait_for_key_event());
    match event {
        Some(event) => {
            let _ = boot::wait_for_event(&mut [event]);
        }
        None => boot::stall(NO_INPUT_DELAY),
    }
}

/// The panic handler.
#[panic_handler]
fn panic_handler(info: &PanicInfo) -> ! {
    let _ = boot::set_watchdog_timer(0, 0, None);

    with_stdout(|stdout| {
        let _ = writeln!(stdout, "bootmenu-rs panicked: {info}");
        let _ = writeln!(stdout, "Press a key to shut down");
    });
    wait_for_acknowledgment();

    runtime::reset(ResetType::SHUTDOWN, Status::ABORTED, None)
}
